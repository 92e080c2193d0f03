//! Normalization and scalar summaries of a field.
//!
//! Two quadratures are in play and they are deliberately not unified:
//! [`norm`] and [`normalize`] use the trapezoidal rule over the whole grid,
//! while [`calculate_transmission`] sums densities with the rectangle rule.
//! The two differ by half the edge densities times `dx`, which is negligible
//! for any packet that stays away from the domain edges.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Serialize;
use crate::{
    Arr1,
    error::LengthError,
    grid::Grid,
    potential::Potential,
    utils::{ rectz, wf_norm, wf_normalized, wf_renormalize },
};

/// Total probability ∫|q|² dx (trapezoidal rule).
pub fn norm<S>(q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    wf_norm(q, dx)
}

/// Rescale `q` in place to unit norm, returning the norm it had before. A
/// field with zero norm is left as it is.
///
/// This must not be applied to a field evolving under an absorbing sink,
/// where the loss of norm is the quantity of interest.
pub fn normalize<S>(q: &mut Arr1<S>, dx: f64) -> f64
where S: nd::DataMut<Elem = C64>
{
    wf_renormalize(q, dx)
}

/// Like [`normalize`], but return a rescaled copy.
pub fn normalized<S>(q: &Arr1<S>, dx: f64) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    wf_normalized(q, dx)
}

/// Probability density `|q|²`.
///
/// For a radial auxiliary function `u(r)` this is already the radial density;
/// no `r²` factor is applied.
pub fn density<S>(q: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| qk.norm_sqr())
}

/// Compute transmission and reflection, in percent, as the probability found
/// strictly to the right and to the left of the barrier.
///
/// The barrier spans the leftmost to the rightmost point where `V > 0`; if
/// there is no such point both results are zero. Densities are summed with the
/// rectangle rule.
pub fn calculate_transmission<S>(q: &Arr1<S>, pot: &Potential, grid: &Grid)
    -> Result<(f64, f64), LengthError>
where S: nd::Data<Elem = C64>
{
    LengthError::check(q, grid.x())?;
    Ok(transmission_of_density(&density(q), pot, grid))
}

// `prob` must have the length of the grid
pub(crate) fn transmission_of_density(
    prob: &nd::Array1<f64>,
    pot: &Potential,
    grid: &Grid,
) -> (f64, f64)
{
    let Some((lo, hi)) = pot.extent(grid) else { return (0.0, 0.0); };
    let select = |keep: &dyn Fn(f64) -> bool| -> nd::Array1<f64> {
        prob.iter().zip(grid.x())
            .filter(|(_, xk)| keep(**xk))
            .map(|(pk, _)| *pk)
            .collect()
    };
    let refl = rectz(&select(&|xk: f64| xk < lo), grid.dx());
    let trans = rectz(&select(&|xk: f64| xk > hi), grid.dx());
    (100.0 * trans, 100.0 * refl)
}

/// Probability density split into the parts left of, inside, and right of the
/// barrier. Each array spans the full grid and holds `NaN` outside its part,
/// so the three can be drawn as separate curves over the same axis.
#[derive(Clone, Debug)]
pub struct Partition {
    pub left: nd::Array1<f64>,
    pub inside: nd::Array1<f64>,
    pub right: nd::Array1<f64>,
}

/// Split the density of `q` according to the extent of `pot`. With no barrier
/// everything counts as left.
pub fn partition<S>(q: &Arr1<S>, pot: &Potential, grid: &Grid)
    -> Result<Partition, LengthError>
where S: nd::Data<Elem = C64>
{
    LengthError::check(q, grid.x())?;
    Ok(partition_density(&density(q), pot, grid))
}

// `prob` must have the length of the grid
pub(crate) fn partition_density(
    prob: &nd::Array1<f64>,
    pot: &Potential,
    grid: &Grid,
) -> Partition
{
    let (lo, hi) = pot.extent(grid).unwrap_or((f64::INFINITY, f64::INFINITY));
    let part = |keep: &dyn Fn(f64) -> bool| -> nd::Array1<f64> {
        nd::Zip::from(prob).and(grid.x())
            .map_collect(|pk, xk| if keep(*xk) { *pk } else { f64::NAN })
    };
    Partition {
        left: part(&|xk: f64| xk < lo),
        inside: part(&|xk: f64| xk >= lo && xk <= hi),
        right: part(&|xk: f64| xk > hi),
    }
}

/// Qualitative scattering regime for a packet of given energy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// The barrier is impenetrable.
    HardWall,
    /// The energy lies below the barrier top, `E < V`.
    Tunneling,
    /// The energy lies at or above the barrier top, `E ≥ V`.
    Scattering,
}

impl Regime {
    /// Classify a packet of mean energy `energy` against `pot`.
    pub fn classify(pot: &Potential, energy: f64) -> Self {
        if pot.is_hard_wall() {
            Self::HardWall
        } else if pot.barrier().height() > energy {
            Self::Tunneling
        } else {
            Self::Scattering
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::HardWall => "hard wall",
            Self::Tunneling => "tunneling (E < V)",
            Self::Scattering => "scattering (E > V)",
        }
    }
}

/// Scalar summary of a session at one instant.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    /// Elapsed simulation time.
    pub time: f64,
    /// Probability right of the barrier, in percent.
    pub transmission_pct: f64,
    /// Probability left of the barrier, in percent.
    pub reflection_pct: f64,
    /// Total probability ∫|ψ|² dx.
    pub norm: f64,
    /// Cumulative captured probability in percent (absorbing mode only).
    pub captured_pct: Option<f64>,
    /// Nominal packet energy `k₀² / 2`.
    pub energy: f64,
    /// Scattering regime.
    pub regime: Regime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::{
        potential::V_INFINITY,
        wavefunction::Packet,
    };

    fn grid() -> Grid { Grid::new(100.0, 1024).unwrap() }

    #[test]
    fn normalize_is_idempotent() {
        let grid = grid();
        let mut q = Packet::default().wavefunction(&grid).mapv(|qk| qk * 3.7);
        let before = normalize(&mut q, grid.dx());
        assert_abs_diff_eq!(before, 3.7_f64.powi(2), epsilon = 1e-9);
        assert_abs_diff_eq!(norm(&q, grid.dx()), 1.0, epsilon = 1e-12);
        let again = normalized(&q, grid.dx());
        let diff: f64 = again.iter().zip(&q).map(|(a, b)| (a - b).norm()).sum();
        assert_abs_diff_eq!(diff, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn packet_left_of_barrier_is_all_reflection() {
        let grid = grid();
        let mut pot = Potential::new(&grid);
        pot.set_single_barrier(&grid, 2.0, 2.0, 10.0);
        let q = Packet::default().wavefunction(&grid);
        let (t, r) = calculate_transmission(&q, &pot, &grid).unwrap();
        assert_abs_diff_eq!(t, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn no_barrier_gives_zero_metrics() {
        let grid = grid();
        let pot = Potential::new(&grid);
        let q = Packet::default().wavefunction(&grid);
        assert_eq!(calculate_transmission(&q, &pot, &grid).unwrap(), (0.0, 0.0));
        let parts = partition(&q, &pot, &grid).unwrap();
        assert!(parts.inside.iter().all(|p| p.is_nan()));
        assert!(parts.right.iter().all(|p| p.is_nan()));
        assert!(parts.left.iter().all(|p| !p.is_nan()));
    }

    #[test]
    fn partition_covers_every_point_once() {
        let grid = grid();
        let mut pot = Potential::new(&grid);
        pot.set_double_barrier(&grid, 1.0, 1.0, 3.0, 0.0);
        let q = Packet::new(0.0, 5.0, 1.0).unwrap().wavefunction(&grid);
        let parts = partition(&q, &pot, &grid).unwrap();
        for i in 0..grid.len() {
            let set
                = [parts.left[i], parts.inside[i], parts.right[i]].iter()
                .filter(|p| !p.is_nan())
                .count();
            assert_eq!(set, 1);
        }
    }

    #[test]
    fn length_mismatch_is_reported() {
        let grid = grid();
        let pot = Potential::new(&grid);
        let q: nd::Array1<C64> = nd::Array1::zeros(10);
        assert!(matches!(
            calculate_transmission(&q, &pot, &grid),
            Err(LengthError(10, 1024)),
        ));
    }

    #[test]
    fn regimes() {
        let grid = grid();
        let mut pot = Potential::new(&grid);
        pot.set_single_barrier(&grid, 5.0, 2.0, 10.0);
        assert_eq!(Regime::classify(&pot, 4.5), Regime::Tunneling);
        pot.set_single_barrier(&grid, 2.0, 2.0, 10.0);
        assert_eq!(Regime::classify(&pot, 4.5), Regime::Scattering);
        pot.set_single_barrier(&grid, V_INFINITY, 2.0, 10.0);
        assert_eq!(Regime::classify(&pot, 4.5), Regime::HardWall);
    }
}
