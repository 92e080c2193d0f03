//! Time evolution of the one-dimensional time-dependent Schrödinger equation
//! (TDSE) via the symmetrized split-step Fourier method, in units where
//! ħ = m = 1.
//!
//! [`SplitStep`] holds everything that depends only on the grid and the time
//! step; the [`Propagate`] implementors decide what happens around it (hard
//! walls, the radial origin condition, absorption). See
//! [`docs`][crate::docs#time-dependence] for the background.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use log::warn;
use std::f64::consts::PI;
use crate::{
    Arr1,
    error::{ ConfigError, LengthError },
    grid::Grid,
    potential::Potential,
    utils::FftPair,
    wavefunction::zero_origin,
};

// multiply elementwise by exp(-i V dt)
fn apply_split_potential<S, T>(V: &Arr1<S>, q: &mut Arr1<T>, dt: f64)
where
    S: nd::Data<Elem = f64>,
    T: nd::DataMut<Elem = C64>,
{
    q.iter_mut().zip(V)
        .for_each(|(qi, Vi)| { *qi *= C64::cis(-Vi * dt); });
}

// zero the field on the wall region if the potential is a hard wall
fn apply_hard_wall<T>(pot: &Potential, q: &mut Arr1<T>)
where T: nd::DataMut<Elem = C64>
{
    if !pot.is_hard_wall() { return; }
    q.iter_mut().zip(pot.wall_mask())
        .for_each(|(qi, &inside)| { if inside { *qi = C64::default(); } });
}

/// Cached operators for one split-step update of fixed size `dt`.
#[derive(Clone, Debug)]
pub struct SplitStep {
    dt: f64,
    kinetic: nd::Array1<C64>,
    plans: FftPair,
}

impl SplitStep {
    /// Precompute the kinetic phase `exp(-i k²/2 dt)` and plan the transforms
    /// for `grid`.
    pub fn new(grid: &Grid, dt: f64) -> Result<Self, ConfigError> {
        ConfigError::check_dt(dt)?;
        let nyquist_phase = grid.k_max().powi(2) / 2.0 * dt;
        if nyquist_phase > PI {
            warn!(
                "kinetic phase at the largest wavenumber is {:.2} rad > π; \
                sharp potentials will scatter into aliased modes (reduce dt \
                or dx)",
                nyquist_phase,
            );
        }
        let kinetic = grid.k().mapv(|kk| C64::cis(-kk.powi(2) / 2.0 * dt));
        let plans = FftPair::new(grid.len());
        Ok(Self { dt, kinetic, plans })
    }

    /// Time step.
    pub fn dt(&self) -> f64 { self.dt }

    fn apply_split_kinetic<T>(&mut self, q: &mut Arr1<T>)
    where T: nd::DataMut<Elem = C64>
    {
        self.plans.fft_inplace(q);
        q.iter_mut().zip(&self.kinetic)
            .for_each(|(qi, Ki)| { *qi *= *Ki; });
        self.plans.ifft_inplace(q);
    }

    /// Advance `q` by one step under `V`:
    /// ```text
    /// q ← exp(-i V dt/2) q
    /// q ← IFFT[ exp(-i k²/2 dt) FFT[q] ]
    /// q ← exp(-i V dt/2) q
    /// ```
    ///
    /// Fails without touching `q` if `q` or `V` does not have the length of
    /// the grid this was built for.
    pub fn apply<S, T>(&mut self, V: &Arr1<S>, q: &mut Arr1<T>)
        -> Result<(), LengthError>
    where
        S: nd::Data<Elem = f64>,
        T: nd::DataMut<Elem = C64>,
    {
        LengthError::check(q, &self.kinetic)?;
        LengthError::check(V, &self.kinetic)?;
        apply_split_potential(V, q, self.dt / 2.0);
        self.apply_split_kinetic(q);
        apply_split_potential(V, q, self.dt / 2.0);
        Ok(())
    }
}

/// A way of advancing a field by one time step.
///
/// Implementors all run [`SplitStep::apply`] and differ in what they enforce
/// afterwards.
pub trait Propagate {
    /// Advance `q` by one time step. Fails without touching `q` if it does
    /// not have the length of `grid`.
    fn step(
        &mut self,
        prop: &mut SplitStep,
        grid: &Grid,
        pot: &Potential,
        q: &mut nd::Array1<C64>,
    ) -> Result<(), LengthError>;

    /// Whether total probability is meant to be conserved, i.e. whether the
    /// caller should renormalize after each step.
    fn conserves_norm(&self) -> bool { true }
}

/// Plain one-dimensional propagation of `ψ(x)`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Cartesian;

impl Propagate for Cartesian {
    fn step(
        &mut self,
        prop: &mut SplitStep,
        grid: &Grid,
        pot: &Potential,
        q: &mut nd::Array1<C64>,
    ) -> Result<(), LengthError> {
        LengthError::check(q, grid.x())?;
        prop.apply(pot.values(), q)?;
        apply_hard_wall(pot, q);
        Ok(())
    }
}

/// Propagation of the radial auxiliary function `u(r) = r ψ(r)`.
///
/// Identical to [`Cartesian`] except that `u` is pinned to zero at the origin
/// after every step, where the substitution is singular. The probability
/// density is `|u|²` with no extra Jacobian.
#[derive(Copy, Clone, Debug, Default)]
pub struct Radial;

impl Propagate for Radial {
    fn step(
        &mut self,
        prop: &mut SplitStep,
        grid: &Grid,
        pot: &Potential,
        q: &mut nd::Array1<C64>,
    ) -> Result<(), LengthError> {
        LengthError::check(q, grid.x())?;
        prop.apply(pot.values(), q)?;
        zero_origin(q, grid);
        apply_hard_wall(pot, q);
        Ok(())
    }
}

/// Selects how a session propagates its field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// [`Cartesian`], renormalized after each step.
    #[default]
    Cartesian,
    /// [`Radial`], renormalized after each step.
    Radial,
    /// [`Absorbing`][crate::sink::Absorbing]; never renormalized.
    Absorbing,
}

impl Mode {
    /// The next mode in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Cartesian => Self::Radial,
            Self::Radial => Self::Absorbing,
            Self::Absorbing => Self::Cartesian,
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cartesian => "1D",
            Self::Radial => "3D radial",
            Self::Absorbing => "absorbing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::{
        utils::wf_norm,
        wavefunction::Packet,
    };

    fn setup() -> (Grid, Potential, SplitStep, nd::Array1<C64>) {
        let grid = Grid::new(100.0, 1024).unwrap();
        let mut pot = Potential::new(&grid);
        pot.set_single_barrier(&grid, 2.0, 2.0, 10.0);
        let prop = SplitStep::new(&grid, 0.05).unwrap();
        let q = Packet::default().wavefunction(&grid);
        (grid, pot, prop, q)
    }

    #[test]
    fn free_step_is_pure_kinetic_phase() {
        let grid = Grid::new(20.0, 64).unwrap();
        let pot = Potential::new(&grid);
        let mut prop = SplitStep::new(&grid, 0.1).unwrap();
        // a single Fourier mode only picks up exp(-i k²/2 dt)
        let kk = grid.k()[3];
        let mut q = grid.x().mapv(|xk| C64::cis(kk * xk));
        let q0 = q.clone();
        Cartesian.step(&mut prop, &grid, &pot, &mut q).unwrap();
        let phase = C64::cis(-kk.powi(2) / 2.0 * 0.1);
        q.iter().zip(&q0)
            .for_each(|(a, b)| assert_abs_diff_eq!((a - b * phase).norm(), 0.0, epsilon = 1e-12));
    }

    #[test]
    fn single_step_is_unitary() {
        let (grid, pot, mut prop, mut q) = setup();
        let q0 = q.clone();
        Cartesian.step(&mut prop, &grid, &pot, &mut q).unwrap();
        let diff: f64 = q.iter().zip(&q0).map(|(a, b)| (a - b).norm()).sum();
        assert!(diff > 1e-3);
        assert_abs_diff_eq!(wf_norm(&q, grid.dx()), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn packet_moves_at_group_velocity() {
        let (grid, pot, mut prop, mut q) = setup();
        // 100 steps at k0 = 3 carry the center from -20 to about -5, well
        // before the barrier at 10
        (0..100).for_each(|_| Cartesian.step(&mut prop, &grid, &pot, &mut q).unwrap());
        let mean: f64
            = q.iter().zip(grid.x())
            .map(|(qk, xk)| qk.norm_sqr() * xk)
            .sum::<f64>() * grid.dx();
        assert_abs_diff_eq!(mean, -5.0, epsilon = 0.1);
    }

    #[test]
    fn hard_wall_is_zeroed_exactly() {
        let (grid, mut pot, mut prop, mut q) = setup();
        pot.set_single_barrier(&grid, 1e7, 2.0, 10.0);
        for _ in 0..300 {
            Cartesian.step(&mut prop, &grid, &pot, &mut q).unwrap();
            q.iter().zip(pot.wall_mask())
                .filter(|(_, inside)| **inside)
                .for_each(|(qk, _)| assert_eq!(qk.norm_sqr(), 0.0));
        }
    }

    #[test]
    fn radial_step_pins_origin() {
        let grid = Grid::new(100.0, 1024).unwrap();
        let pot = Potential::new(&grid);
        let mut prop = SplitStep::new(&grid, 0.05).unwrap();
        let mut u = Packet::new(-3.0, 1.0, 2.0).unwrap().radial_wavefunction(&grid);
        for _ in 0..100 {
            Radial.step(&mut prop, &grid, &pot, &mut u).unwrap();
            assert_eq!(u[512], C64::default());
        }
        assert!(Radial.conserves_norm());
    }

    #[test]
    fn mismatched_field_is_rejected_untouched() {
        let (grid, pot, mut prop, _) = setup();
        let short = Packet::default().wavefunction(&Grid::new(100.0, 512).unwrap());
        let mut q = short.clone();
        assert!(matches!(
            Cartesian.step(&mut prop, &grid, &pot, &mut q),
            Err(LengthError(512, 1024)),
        ));
        assert!(matches!(
            Radial.step(&mut prop, &grid, &pot, &mut q),
            Err(LengthError(512, 1024)),
        ));
        assert!(matches!(prop.apply(pot.values(), &mut q), Err(LengthError(512, 1024))));
        assert_eq!(q, short);

        // a potential built for another grid is caught as well
        let mut q = Packet::default().wavefunction(&grid);
        let other = Potential::new(&Grid::new(100.0, 256).unwrap());
        assert!(matches!(prop.apply(other.values(), &mut q), Err(LengthError(256, 1024))));
    }

    #[test]
    fn modes_cycle() {
        assert_eq!(Mode::Cartesian.next().next().next(), Mode::Cartesian);
        assert_eq!(Mode::default(), Mode::Cartesian);
    }

    #[test]
    fn rejects_bad_timestep() {
        let grid = Grid::new(10.0, 16).unwrap();
        assert!(matches!(SplitStep::new(&grid, 0.0), Err(ConfigError::BadTimestep(_))));
        assert!(matches!(SplitStep::new(&grid, f64::INFINITY), Err(ConfigError::BadTimestep(_))));
    }
}
