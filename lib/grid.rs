//! Fixed spatial sampling and its paired momentum-space grid.

use std::f64::consts::TAU;
use ndarray as nd;
use crate::{
    error::ConfigError,
    utils::fft_freq,
};

/// Uniform sampling of `[-L/2, L/2)` with `N` points, together with the
/// angular wavenumbers of the matching discrete Fourier transform.
///
/// Positions are `x[i] = -L/2 + i dx` with `dx = L / N`, so for even `N` the
/// point `N / 2` sits exactly at the origin. The wavenumber array is in
/// transform order (see [`fft_freq`]) rather than monotonic.
///
/// ```
/// use qtunnel::grid::Grid;
///
/// let grid = Grid::new(100.0, 1024).unwrap();
/// assert_eq!(grid.len(), 1024);
/// assert_eq!(grid.x()[512], 0.0);
/// assert!(grid.k()[511] > 0.0 && grid.k()[512] < 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Grid {
    length: f64,
    dx: f64,
    x: nd::Array1<f64>,
    r: nd::Array1<f64>,
    k: nd::Array1<f64>,
}

impl Grid {
    /// Construct the grid for a domain of length `length` sampled at `points`
    /// points.
    pub fn new(length: f64, points: usize) -> Result<Self, ConfigError> {
        ConfigError::check_length(length)?;
        ConfigError::check_points(points)?;
        let dx = length / points as f64;
        let x: nd::Array1<f64>
            = (0..points)
            .map(|i| -length / 2.0 + i as f64 * dx)
            .collect();
        let r = x.mapv(f64::abs);
        let k = fft_freq(points, dx) * TAU;
        Ok(Self { length, dx, x, r, k })
    }

    // uniformly spaced positions that need not be centered on the origin
    #[cfg(test)]
    pub(crate) fn from_positions(x: nd::Array1<f64>) -> Self {
        let points = x.len();
        let dx = x[1] - x[0];
        let r = x.mapv(f64::abs);
        let k = fft_freq(points, dx) * TAU;
        Self { length: dx * points as f64, dx, x, r, k }
    }

    /// Number of sample points.
    pub fn len(&self) -> usize { self.x.len() }

    /// Total domain length.
    pub fn length(&self) -> f64 { self.length }

    /// Sample spacing.
    pub fn dx(&self) -> f64 { self.dx }

    /// Sample positions.
    pub fn x(&self) -> &nd::Array1<f64> { &self.x }

    /// Radial coordinate `|x|`, used only when the field is read as
    /// `u(r) = r ψ(r)`.
    pub fn r(&self) -> &nd::Array1<f64> { &self.r }

    /// Angular wavenumbers in transform order.
    pub fn k(&self) -> &nd::Array1<f64> { &self.k }

    /// Largest representable wavenumber magnitude, `π / dx`.
    pub fn k_max(&self) -> f64 { self.k.iter().fold(0.0, |acc, kk| acc.max(kk.abs())) }

    /// Boolean mask for points strictly inside `(lo, hi)`.
    pub fn open_mask(&self, lo: f64, hi: f64) -> nd::Array1<bool> {
        self.x.mapv(|xk| xk > lo && xk < hi)
    }

    /// Boolean mask for points inside `[lo, hi]`, edges included.
    pub fn closed_mask(&self, lo: f64, hi: f64) -> nd::Array1<bool> {
        self.x.mapv(|xk| xk >= lo && xk <= hi)
    }
}
