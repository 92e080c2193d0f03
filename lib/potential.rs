//! Potential-energy landscapes sampled over a [`Grid`].
//!
//! Every builder fully overwrites the sampled potential; nothing accumulates
//! across calls. Edge convention: single barriers (and hard walls) cover the
//! points strictly inside `(center - width/2, center + width/2)`, while each
//! wall of a double barrier covers its closed interval, edges included. At
//! the resolutions used here the one-point difference has no physical effect.

use ndarray as nd;
use log::debug;
use crate::{
    error::ConfigError,
    grid::Grid,
};

/// Height at (and above) which a barrier is treated as impenetrable.
///
/// A literal infinite phase factor is numerically degenerate, so a hard wall
/// stores this finite value and additionally has the field zeroed inside it
/// after every step.
pub const V_INFINITY: f64 = 1e6;

/// A potential landscape and its physical parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Barrier {
    /// Free propagation, `V = 0` everywhere.
    None,
    /// A single rectangular barrier. Heights at or above [`V_INFINITY`] are
    /// promoted to [`Barrier::HardWall`].
    Single { height: f64, width: f64, center: f64 },
    /// A reflecting wall.
    HardWall { width: f64, center: f64 },
    /// Two rectangular barriers of equal height and width separated by a
    /// well of width `gap`, placed symmetrically about `center`.
    Double { height: f64, width: f64, gap: f64, center: f64 },
}

impl Barrier {
    /// Check that all parameters are physically sensible.
    ///
    /// A single barrier may be infinitely tall; the double barrier's height
    /// must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::None => Ok(()),
            Self::Single { height, width, center } => {
                // anything at or above V_INFINITY is clamped to a hard wall
                ConfigError::check_height("barrier height", height)?;
                ConfigError::check_nonneg("barrier width", width)?;
                ConfigError::check_finite("barrier center", center)
            },
            Self::HardWall { width, center } => {
                ConfigError::check_nonneg("barrier width", width)?;
                ConfigError::check_finite("barrier center", center)
            },
            Self::Double { height, width, gap, center } => {
                ConfigError::check_nonneg("barrier height", height)?;
                ConfigError::check_nonneg("barrier width", width)?;
                ConfigError::check_nonneg("barrier gap", gap)?;
                ConfigError::check_finite("barrier center", center)
            },
        }
    }

    /// Nominal barrier height, with hard walls reported as [`V_INFINITY`].
    pub fn height(&self) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Single { height, .. } => height.min(V_INFINITY),
            Self::HardWall { .. } => V_INFINITY,
            Self::Double { height, .. } => height,
        }
    }
}

/// Sampled potential `V(x)` together with the hard-wall flag.
#[derive(Clone, Debug)]
pub struct Potential {
    v: nd::Array1<f64>,
    wall: nd::Array1<bool>,
    hard_wall: bool,
    barrier: Barrier,
}

impl Potential {
    /// An all-zero potential on `grid`.
    pub fn new(grid: &Grid) -> Self {
        Self {
            v: nd::Array1::zeros(grid.len()),
            wall: nd::Array1::from_elem(grid.len(), false),
            hard_wall: false,
            barrier: Barrier::None,
        }
    }

    /// Build the potential for `barrier` after validating its parameters. On
    /// error the current potential is left untouched.
    pub fn configure(&mut self, grid: &Grid, barrier: Barrier)
        -> Result<(), ConfigError>
    {
        barrier.validate()?;
        match barrier {
            Barrier::None => { self.clear(); },
            Barrier::Single { height, width, center } => {
                self.set_single_barrier(grid, height, width, center);
            },
            Barrier::HardWall { width, center } => {
                self.set_single_barrier(grid, V_INFINITY, width, center);
            },
            Barrier::Double { height, width, gap, center } => {
                self.set_double_barrier(grid, height, width, gap, center);
            },
        }
        debug!(
            "potential: {:?} (hard wall: {}, {} points above zero)",
            self.barrier,
            self.hard_wall,
            self.v.iter().filter(|vk| **vk > 0.0).count(),
        );
        Ok(())
    }

    /// Zero the potential everywhere.
    pub fn clear(&mut self) {
        self.v.fill(0.0);
        self.wall.fill(false);
        self.hard_wall = false;
        self.barrier = Barrier::None;
    }

    /// Set a single barrier of the given height on the points strictly inside
    /// `(center - width/2, center + width/2)`.
    ///
    /// Heights at or above [`V_INFINITY`] are stored as [`V_INFINITY`] and
    /// raise the hard-wall flag; any other height lowers it.
    pub fn set_single_barrier(
        &mut self,
        grid: &Grid,
        height: f64,
        width: f64,
        center: f64,
    ) {
        let mask = grid.open_mask(center - width / 2.0, center + width / 2.0);
        let (height, hard_wall)
            = if height >= V_INFINITY {
                (V_INFINITY, true)
            } else {
                (height, false)
            };
        nd::Zip::from(&mut self.v).and(&mask)
            .for_each(|vk, &inside| { *vk = if inside { height } else { 0.0 }; });
        self.wall = mask;
        self.hard_wall = hard_wall;
        self.barrier
            = if hard_wall {
                Barrier::HardWall { width, center }
            } else {
                Barrier::Single { height, width, center }
            };
    }

    /// Set two barriers of the given height and width on the closed intervals
    /// `[center - gap/2 - width, center - gap/2]` and
    /// `[center + gap/2, center + gap/2 + width]`.
    ///
    /// Never raises the hard-wall flag. A zero width leaves `V = 0`.
    pub fn set_double_barrier(
        &mut self,
        grid: &Grid,
        height: f64,
        width: f64,
        gap: f64,
        center: f64,
    ) {
        self.clear();
        self.barrier = Barrier::Double { height, width, gap, center };
        if width <= 0.0 { return; }
        let left = grid.closed_mask(center - gap / 2.0 - width, center - gap / 2.0);
        let right = grid.closed_mask(center + gap / 2.0, center + gap / 2.0 + width);
        nd::Zip::from(&mut self.v).and(&left).and(&right)
            .for_each(|vk, &l, &r| { if l || r { *vk = height; } });
    }

    /// Sampled values of `V`.
    pub fn values(&self) -> &nd::Array1<f64> { &self.v }

    /// `true` if the current barrier is a hard wall.
    pub fn is_hard_wall(&self) -> bool { self.hard_wall }

    /// Points zeroed after each step when the hard-wall flag is set.
    pub fn wall_mask(&self) -> &nd::Array1<bool> { &self.wall }

    /// The landscape the potential was last built from.
    pub fn barrier(&self) -> Barrier { self.barrier }

    /// Positions of the leftmost and rightmost points where `V > 0`, or `None`
    /// if the potential vanishes everywhere.
    pub fn extent(&self, grid: &Grid) -> Option<(f64, f64)> {
        let mut inside
            = self.v.iter().zip(grid.x())
            .filter(|(vk, _)| **vk > 0.0)
            .map(|(_, xk)| *xk);
        let first = inside.next()?;
        let last = inside.last().unwrap_or(first);
        Some((first, last))
    }
}
