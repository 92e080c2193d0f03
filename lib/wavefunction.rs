//! Initial conditions.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use log::warn;
use crate::{
    error::ConfigError,
    grid::Grid,
};

/// Points with `r` below this are treated as sitting on the origin.
pub const R_TOLERANCE: f64 = 1e-10;

/// A Gaussian wave packet
/// ```text
/// ψ₀(x) = A exp(-(x - x₀)² / 2σ²) exp(i k₀ x),  A = 1 / √(σ √π)
/// ```
/// normalized so that ∫|ψ₀|² dx = 1 when σ is small compared to the domain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Packet {
    /// Initial center.
    pub x0: f64,
    /// Width.
    pub sigma: f64,
    /// Central wavenumber.
    pub k0: f64,
}

impl Packet {
    /// Construct a packet, rejecting non-positive widths.
    pub fn new(x0: f64, sigma: f64, k0: f64) -> Result<Self, ConfigError> {
        let packet = Self { x0, sigma, k0 };
        packet.validate()?;
        Ok(packet)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_sigma(self.sigma)?;
        ConfigError::check_finite("packet center x0", self.x0)?;
        ConfigError::check_finite("packet wavenumber k0", self.k0)
    }

    /// Mean kinetic energy of the carrier, `k₀² / 2`.
    pub fn nominal_energy(&self) -> f64 { self.k0.powi(2) / 2.0 }

    /// Sample the packet over `grid`.
    ///
    /// ```
    /// use qtunnel::{ grid::Grid, utils::wf_norm, wavefunction::Packet };
    ///
    /// let grid = Grid::new(100.0, 1024).unwrap();
    /// let q = Packet::new(-20.0, 2.0, 3.0).unwrap().wavefunction(&grid);
    /// assert!((wf_norm(&q, grid.dx()) - 1.0).abs() < 1e-9);
    /// ```
    pub fn wavefunction(&self, grid: &Grid) -> nd::Array1<C64> {
        let x = grid.x();
        let lo = x[0];
        let hi = x[x.len() - 1];
        if self.x0 - 5.0 * self.sigma < lo || self.x0 + 5.0 * self.sigma > hi {
            warn!(
                "packet at x0 = {} with sigma = {} is not contained in [{}, {}]; \
                its norm will be off",
                self.x0, self.sigma, lo, hi,
            );
        }
        let amp = (self.sigma * PI.sqrt()).sqrt().recip();
        x.mapv(|xk| {
            let envelope = (-0.5 * ((xk - self.x0) / self.sigma).powi(2)).exp();
            amp * envelope * C64::cis(self.k0 * xk)
        })
    }

    /// Sample the packet as a radial auxiliary function `u(r)`, which must
    /// vanish at the origin.
    pub fn radial_wavefunction(&self, grid: &Grid) -> nd::Array1<C64> {
        let mut u = self.wavefunction(grid);
        zero_origin(&mut u, grid);
        u
    }
}

impl Default for Packet {
    fn default() -> Self { Self { x0: -20.0, sigma: 2.0, k0: 3.0 } }
}

/// Zero a radial auxiliary function at every point numerically on the origin.
pub(crate) fn zero_origin<S>(u: &mut nd::ArrayBase<S, nd::Ix1>, grid: &Grid)
where S: nd::DataMut<Elem = C64>
{
    let n = grid.len();
    if n % 2 == 0 { u[n / 2] = C64::default(); }
    nd::Zip::from(u).and(grid.r())
        .for_each(|uk, rk| { if *rk < R_TOLERANCE { *uk = C64::default(); } });
}
