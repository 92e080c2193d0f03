//! Irreversible capture of probability by a local absorbing region, a toy
//! model of exciton transport into a photosynthetic reaction center.
//!
//! Each step, after ordinary propagation, the probability sitting inside the
//! sink is partly booked as captured and the field there is damped. The
//! effective Hamiltonian is non-Hermitian and the total norm decreases over
//! time; the field is never renormalized.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ ConfigError, LengthError },
    grid::Grid,
    potential::Potential,
    timedep::{ Cartesian, Propagate, SplitStep },
};

/// An absorbing region `(center - width/2, center + width/2)` and the
/// probability it has captured so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Sink {
    center: f64,
    width: f64,
    strength: f64,
    captured: f64,
}

impl Sink {
    /// Default width.
    pub const WIDTH: f64 = 15.0;
    /// Default strength.
    pub const STRENGTH: f64 = 0.05;

    /// Construct a sink that has captured nothing yet.
    pub fn new(center: f64, width: f64, strength: f64)
        -> Result<Self, ConfigError>
    {
        ConfigError::check_finite("sink center", center)?;
        ConfigError::check_nonneg("sink width", width)?;
        ConfigError::check_nonneg("sink strength", strength)?;
        Ok(Self { center, width, strength, captured: 0.0 })
    }

    /// Sink center.
    pub fn center(&self) -> f64 { self.center }

    /// Sink width.
    pub fn width(&self) -> f64 { self.width }

    /// Per-step capture rate.
    pub fn strength(&self) -> f64 { self.strength }

    /// Points strictly inside the sink.
    pub fn mask(&self, grid: &Grid) -> nd::Array1<bool> {
        grid.open_mask(self.center - self.width / 2.0, self.center + self.width / 2.0)
    }

    /// Book `strength · ∫_sink |q|² dx` as captured and damp `q` inside the
    /// sink by `exp(-strength)`. Returns the probability captured by this call.
    pub fn capture(&mut self, q: &mut nd::Array1<C64>, grid: &Grid) -> f64 {
        let mask = self.mask(grid);
        let damping = (-self.strength).exp();
        let mut inside: f64 = 0.0;
        q.iter_mut().zip(&mask)
            .filter(|(_, m)| **m)
            .for_each(|(qk, _)| {
                inside += qk.norm_sqr();
                *qk *= damping;
            });
        let captured = inside * grid.dx() * self.strength;
        self.captured += captured;
        captured
    }

    /// Cumulative captured probability.
    pub fn captured(&self) -> f64 { self.captured }

    /// Cumulative captured probability in percent, saturating at 100.
    pub fn efficiency_percent(&self) -> f64 { (100.0 * self.captured).min(100.0) }

    /// Forget everything captured so far.
    pub fn reset(&mut self) { self.captured = 0.0; }
}

/// Cartesian propagation followed by absorption into a [`Sink`].
#[derive(Clone, Debug)]
pub struct Absorbing {
    pub sink: Sink,
}

impl Absorbing {
    pub fn new(sink: Sink) -> Self { Self { sink } }
}

impl Propagate for Absorbing {
    fn step(
        &mut self,
        prop: &mut SplitStep,
        grid: &Grid,
        pot: &Potential,
        q: &mut nd::Array1<C64>,
    ) -> Result<(), LengthError> {
        Cartesian.step(prop, grid, pot, q)?;
        self.sink.capture(q, grid);
        Ok(())
    }

    fn conserves_norm(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::utils::wf_norm;

    #[test]
    fn capture_books_and_damps() {
        let grid = Grid::new(10.0, 100).unwrap();
        let mut q: nd::Array1<C64> = nd::Array1::from_elem(100, C64::new(1.0, 0.0));
        let mut sink = Sink::new(0.0, 2.0, 0.1).unwrap();
        let npts = sink.mask(&grid).iter().filter(|m| **m).count();
        assert_eq!(npts, 19);
        let got = sink.capture(&mut q, &grid);
        assert_abs_diff_eq!(got, 19.0 * 0.1 * 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sink.captured(), got);
        assert_abs_diff_eq!(q[50].re, (-0.1_f64).exp(), epsilon = 1e-15);
        assert_eq!(q[0], C64::new(1.0, 0.0));
    }

    #[test]
    fn efficiency_saturates() {
        let grid = Grid::new(10.0, 100).unwrap();
        let mut q: nd::Array1<C64> = nd::Array1::from_elem(100, C64::new(10.0, 0.0));
        let mut sink = Sink::new(0.0, 8.0, 1.0).unwrap();
        sink.capture(&mut q, &grid);
        assert!(sink.captured() > 1.0);
        assert_eq!(sink.efficiency_percent(), 100.0);
        sink.reset();
        assert_eq!(sink.efficiency_percent(), 0.0);
    }

    #[test]
    fn absorbing_step_loses_norm() {
        let grid = Grid::new(100.0, 1024).unwrap();
        let pot = Potential::new(&grid);
        let mut prop = SplitStep::new(&grid, 0.05).unwrap();
        let mut q = crate::wavefunction::Packet::new(14.0, 2.0, 0.0)
            .unwrap()
            .wavefunction(&grid);
        let mut abs = Absorbing::new(Sink::new(14.0, 15.0, 0.05).unwrap());
        assert!(!abs.conserves_norm());
        let mut last = wf_norm(&q, grid.dx());
        for _ in 0..20 {
            abs.step(&mut prop, &grid, &pot, &mut q).unwrap();
            let now = wf_norm(&q, grid.dx());
            assert!(now < last);
            last = now;
        }
        assert!(abs.sink.captured() > 0.0);
    }

    #[test]
    fn rejects_negative_parameters() {
        assert!(Sink::new(0.0, -1.0, 0.05).is_err());
        assert!(Sink::new(0.0, 1.0, -0.05).is_err());
        assert!(Sink::new(f64::NAN, 1.0, 0.05).is_err());
    }
}
