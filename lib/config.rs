//! Session configuration, loadable from TOML.
//!
//! Every field has a default, so an empty document (or [`SimConfig::default`])
//! gives the reference tunneling scenario: a packet at x₀ = -20 with σ = 2 and
//! k₀ = 3 meeting a barrier of height 2 and width 2 centered at 10, on
//! N = 1024 points spanning L = 100, with dt = 0.05.
//!
//! ```
//! use qtunnel::{ config::{ BarrierKind, SimConfig }, timedep::Mode };
//!
//! let config = SimConfig::from_toml_str(r#"
//!     mode = "absorbing"
//!
//!     [barrier]
//!     kind = "double"
//!     gap = 3.0
//! "#).unwrap();
//! assert_eq!(config.mode, Mode::Absorbing);
//! assert_eq!(config.barrier.kind, BarrierKind::Double);
//! assert_eq!(config.barrier.height, 2.0);
//! assert_eq!(config.grid.points, 1024);
//! ```

use std::path::Path;
use serde::{ Deserialize, Serialize };
use crate::{
    error::ConfigError,
    potential::Barrier,
    sink::Sink,
    timedep::Mode,
    wavefunction::Packet,
};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Spatial grid and time step.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Domain length L.
    pub length: f64,
    /// Number of points N.
    pub points: usize,
    /// Time step.
    pub dt: f64,
}

impl Default for GridConfig {
    fn default() -> Self { Self { length: 100.0, points: 1024, dt: 0.05 } }
}

/// Initial Gaussian packet.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    pub x0: f64,
    pub sigma: f64,
    pub k0: f64,
}

impl Default for PacketConfig {
    fn default() -> Self {
        let Packet { x0, sigma, k0 } = Packet::default();
        Self { x0, sigma, k0 }
    }
}

impl PacketConfig {
    /// Validate and convert.
    pub fn packet(&self) -> ConfigResult<Packet> {
        Packet::new(self.x0, self.sigma, self.k0)
    }
}

/// Which landscape to build.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierKind {
    None,
    #[default]
    Single,
    Double,
    HardWall,
}

/// Potential landscape parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    pub kind: BarrierKind,
    pub height: f64,
    pub width: f64,
    pub center: f64,
    /// Well width between the two walls; only used by
    /// [`BarrierKind::Double`].
    pub gap: f64,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            kind: BarrierKind::Single,
            height: 2.0,
            width: 2.0,
            center: 10.0,
            gap: 4.0,
        }
    }
}

impl BarrierConfig {
    /// Validate and convert.
    pub fn barrier(&self) -> ConfigResult<Barrier> {
        let Self { kind, height, width, center, gap } = *self;
        let barrier
            = match kind {
                BarrierKind::None => Barrier::None,
                BarrierKind::Single => Barrier::Single { height, width, center },
                BarrierKind::Double
                    => Barrier::Double { height, width, gap, center },
                BarrierKind::HardWall => Barrier::HardWall { width, center },
            };
        barrier.validate()?;
        Ok(barrier)
    }
}

/// Absorbing sink parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Defaults to just past the barrier, at `barrier.center + 2 barrier.width`.
    pub center: Option<f64>,
    pub width: f64,
    pub strength: f64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self { center: None, width: Sink::WIDTH, strength: Sink::STRENGTH }
    }
}

impl SinkConfig {
    /// Validate and convert, placing the sink relative to `barrier` if no
    /// center was given.
    pub fn sink(&self, barrier: &BarrierConfig) -> ConfigResult<Sink> {
        let center = self.center.unwrap_or(barrier.center + 2.0 * barrier.width);
        Sink::new(center, self.width, self.strength)
    }
}

/// Complete session configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: Mode,
    /// Multiplier applied to `dt` when accumulating elapsed time; never
    /// changes the step itself.
    pub time_scale: f64,
    pub grid: GridConfig,
    pub packet: PacketConfig,
    pub barrier: BarrierConfig,
    pub sink: SinkConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            time_scale: 1.0,
            grid: GridConfig::default(),
            packet: PacketConfig::default(),
            barrier: BarrierConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse from a TOML document. The result is validated.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file. The result is validated.
    pub fn load<P>(path: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Check every parameter without building anything.
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigError::check_length(self.grid.length)?;
        ConfigError::check_points(self.grid.points)?;
        ConfigError::check_dt(self.grid.dt)?;
        ConfigError::check_time_scale(self.time_scale)?;
        self.packet.packet()?;
        self.barrier.barrier()?;
        self.sink.sink(&self.barrier)?;
        Ok(())
    }

    /// Serialize back to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
