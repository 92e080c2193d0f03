#![allow(non_snake_case)]

//! Provides a split-step Fourier solver for the one-dimensional,
//! time-dependent Schrödinger equation, set up for demonstrations of quantum
//! tunneling.
//!
//! Provides the following:
//! - Potential landscapes:
//!     - Single rectangular barrier
//!     - Double barrier (resonant tunneling)
//!     - Hard wall
//! - Propagation modes:
//!     - Cartesian `ψ(x)`, renormalized each step
//!     - Radial `u(r) = r ψ(r)`, pinned to zero at the origin
//!     - Absorbing sink with cumulative capture efficiency
//! - Observables: norm, transmission and reflection, density partition, and
//!   scattering regime
//!
//! [`session::Session`] ties these together; [`config::SimConfig`] describes
//! one, and can be read from TOML.
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod utils;
pub mod grid;
pub mod potential;
pub mod wavefunction;
pub mod timedep;
pub mod observables;
pub mod sink;
pub mod config;
pub mod session;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;

pub use config::SimConfig;
pub use potential::Barrier;
pub use session::Session;
pub use timedep::Mode;
