//! Error types for simulation setup and field handling.
//!
//! Everything derives [`thiserror::Error`], so these compose with `?` inside
//! the crate and with [`anyhow`][anyhow] in applications built on top.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when a field or potential does not have the length of the grid it
/// is being stepped, measured, or rescaled on.
#[derive(Debug, Error)]
#[error("array length {0} does not match grid length {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when a simulation parameter is rejected.
///
/// Validation always happens before anything is mutated, so a rejected value
/// leaves the previous state in place.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the grid has fewer than two points.
    #[error("grid must have at least 2 points; got {0}")]
    BadGridSize(usize),

    /// Returned when the domain length is non-positive or not finite.
    #[error("domain length must be finite and greater than 0; got {0}")]
    BadLength(f64),

    /// Returned when the time step is non-positive or not finite.
    #[error("time step must be finite and greater than 0; got {0}")]
    BadTimestep(f64),

    /// Returned when a wave packet width is non-positive or not finite.
    #[error("packet width sigma must be finite and greater than 0; got {0}")]
    BadSigma(f64),

    /// Returned when the elapsed-time scale is non-positive or not finite.
    #[error("time scale must be finite and greater than 0; got {0}")]
    BadTimeScale(f64),

    /// Returned when a quantity that must be a non-negative real number is
    /// negative, NaN, or infinite.
    #[error("{name} must be finite and non-negative; got {value}")]
    Negative { name: &'static str, value: f64 },

    /// Returned when a quantity that must be a real number is NaN or infinite.
    #[error("{name} must be finite; got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// [`toml::de::Error`].
    #[error("could not parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// [`std::io::Error`].
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn check_points(points: usize) -> Result<(), Self> {
        (points >= 2).then_some(()).ok_or(Self::BadGridSize(points))
    }

    pub(crate) fn check_length(length: f64) -> Result<(), Self> {
        (length.is_finite() && length > 0.0)
            .then_some(()).ok_or(Self::BadLength(length))
    }

    pub(crate) fn check_dt(dt: f64) -> Result<(), Self> {
        (dt.is_finite() && dt > 0.0)
            .then_some(()).ok_or(Self::BadTimestep(dt))
    }

    pub(crate) fn check_sigma(sigma: f64) -> Result<(), Self> {
        (sigma.is_finite() && sigma > 0.0)
            .then_some(()).ok_or(Self::BadSigma(sigma))
    }

    pub(crate) fn check_time_scale(scale: f64) -> Result<(), Self> {
        (scale.is_finite() && scale > 0.0)
            .then_some(()).ok_or(Self::BadTimeScale(scale))
    }

    pub(crate) fn check_nonneg(name: &'static str, value: f64)
        -> Result<(), Self>
    {
        (value.is_finite() && value >= 0.0)
            .then_some(()).ok_or(Self::Negative { name, value })
    }

    // like `check_nonneg`, but +∞ is allowed
    pub(crate) fn check_height(name: &'static str, value: f64)
        -> Result<(), Self>
    {
        (value >= 0.0).then_some(()).ok_or(Self::Negative { name, value })
    }

    pub(crate) fn check_finite(name: &'static str, value: f64)
        -> Result<(), Self>
    {
        value.is_finite()
            .then_some(()).ok_or(Self::NotFinite { name, value })
    }
}

/// Returned from [`Session`][crate::session::Session] operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// [`ConfigError`]
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}
