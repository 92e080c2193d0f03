//! A running simulation: grid, potential, field, and clock in one place.
//!
//! A [`Session`] owns all mutable state explicitly; there is nothing global.
//! Every mutating method takes `&mut self`, so a single session is advanced by
//! one caller at a time and no step can observe a half-rebuilt potential.
//!
//! ```
//! use qtunnel::{ config::SimConfig, session::Session, timedep::Mode };
//!
//! let mut session = Session::new(SimConfig::default()).unwrap();
//! session.run(20).unwrap();
//! let m = session.metrics();
//! assert!((m.norm - 1.0).abs() < 1e-6);
//! assert!(m.transmission_pct + m.reflection_pct <= 100.0 + 1e-9);
//!
//! session.set_mode(Mode::Absorbing);
//! assert_eq!(session.time(), 0.0);
//! assert_eq!(session.metrics().captured_pct, Some(0.0));
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use log::{ debug, trace, warn };
use crate::{
    Arr1,
    config::SimConfig,
    error::{ ConfigError, LengthError, SimError },
    grid::Grid,
    observables::{
        self,
        Metrics,
        Partition,
        Regime,
    },
    potential::{ Barrier, Potential },
    sink::{ Absorbing, Sink },
    timedep::{ Cartesian, Mode, Propagate, Radial, SplitStep },
    wavefunction::Packet,
};

pub type SimResult<T> = Result<T, SimError>;

// one propagation strategy per mode; only the absorbing one carries state
#[derive(Clone, Debug)]
enum Strategy {
    Cartesian(Cartesian),
    Radial(Radial),
    Absorbing(Absorbing),
}

impl Strategy {
    fn for_mode(mode: Mode, sink: &Sink) -> Self {
        match mode {
            Mode::Cartesian => Self::Cartesian(Cartesian),
            Mode::Radial => Self::Radial(Radial),
            Mode::Absorbing => {
                let mut sink = sink.clone();
                sink.reset();
                Self::Absorbing(Absorbing::new(sink))
            },
        }
    }

    fn propagator(&mut self) -> &mut dyn Propagate {
        match self {
            Self::Cartesian(p) => p,
            Self::Radial(p) => p,
            Self::Absorbing(p) => p,
        }
    }

    fn sink(&self) -> Option<&Sink> {
        match self {
            Self::Absorbing(p) => Some(&p.sink),
            _ => None,
        }
    }

    fn sink_mut(&mut self) -> Option<&mut Sink> {
        match self {
            Self::Absorbing(p) => Some(&mut p.sink),
            _ => None,
        }
    }
}

/// State of one simulation.
#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    potential: Potential,
    prop: SplitStep,
    packet: Packet,
    mode: Mode,
    strategy: Strategy,
    sink: Sink,
    field: nd::Array1<C64>,
    time: f64,
    time_scale: f64,
    steps: usize,
}

impl Session {
    /// Build a session from `config`, with the field set to the configured
    /// packet and the clock at zero.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid.length, config.grid.points)?;
        let prop = SplitStep::new(&grid, config.grid.dt)?;
        let mut potential = Potential::new(&grid);
        potential.configure(&grid, config.barrier.barrier()?)?;
        let packet = config.packet.packet()?;
        let sink = config.sink.sink(&config.barrier)?;
        let strategy = Strategy::for_mode(config.mode, &sink);
        let field = initial_field(config.mode, &packet, &grid);
        warn_if_overlapping(&packet, &potential, &grid);
        debug!(
            "new session: L = {}, N = {}, dx = {:.5}, dt = {}, mode = {}",
            grid.length(),
            grid.len(),
            grid.dx(),
            prop.dt(),
            config.mode.label(),
        );
        Ok(Self {
            grid,
            potential,
            prop,
            packet,
            mode: config.mode,
            strategy,
            sink,
            field,
            time: 0.0,
            time_scale: config.time_scale,
            steps: 0,
        })
    }

    /// Replace the potential landscape. The field and clock are not touched,
    /// so a barrier may be changed while a packet is in flight. Invalid
    /// parameters are rejected before anything changes.
    pub fn configure_barrier(&mut self, barrier: Barrier) -> SimResult<()> {
        self.potential.configure(&self.grid, barrier)?;
        Ok(())
    }

    /// Change only the height of the current barrier, keeping its shape.
    ///
    /// An empty landscape has no height to change and is left as it is; a hard
    /// wall becomes a finite single barrier of the same extent unless `height`
    /// reaches [`V_INFINITY`][crate::potential::V_INFINITY].
    pub fn set_barrier_height(&mut self, height: f64) -> SimResult<()> {
        let barrier
            = match self.potential.barrier() {
                Barrier::None => { return Ok(()); },
                Barrier::Single { width, center, .. }
                | Barrier::HardWall { width, center }
                    => Barrier::Single { height, width, center },
                Barrier::Double { width, gap, center, .. }
                    => Barrier::Double { height, width, gap, center },
            };
        self.configure_barrier(barrier)
    }

    /// Replace the initial packet and reset to it. Invalid parameters are
    /// rejected before anything changes.
    pub fn initialize_wavefunction(&mut self, x0: f64, sigma: f64, k0: f64)
        -> SimResult<()>
    {
        self.packet = Packet::new(x0, sigma, k0)?;
        self.reset();
        Ok(())
    }

    /// Switch propagation mode. This always starts over from a fresh field
    /// built for the new mode, with a fresh sink and the clock at zero.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!("mode: {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
        self.strategy = Strategy::for_mode(mode, &self.sink);
        self.reset();
    }

    /// Replace the sink used in absorbing mode. If that mode is active the
    /// session is reset, since the captured total refers to the old sink.
    pub fn set_sink(&mut self, sink: Sink) {
        self.sink = sink;
        if self.mode == Mode::Absorbing {
            self.strategy = Strategy::for_mode(self.mode, &self.sink);
            self.reset();
        }
    }

    /// Set the multiplier applied to `dt` when accumulating elapsed time. The
    /// propagation step itself is unaffected.
    pub fn set_time_scale(&mut self, scale: f64) -> SimResult<()> {
        ConfigError::check_time_scale(scale)?;
        self.time_scale = scale;
        Ok(())
    }

    /// Rebuild the field from the current packet and zero the clock and sink.
    /// The potential is kept.
    pub fn reset(&mut self) {
        self.field = initial_field(self.mode, &self.packet, &self.grid);
        self.time = 0.0;
        self.steps = 0;
        if let Some(sink) = self.strategy.sink_mut() { sink.reset(); }
        warn_if_overlapping(&self.packet, &self.potential, &self.grid);
        debug!(
            "reset: x0 = {}, sigma = {}, k0 = {} ({})",
            self.packet.x0, self.packet.sigma, self.packet.k0, self.mode.label(),
        );
    }

    /// Advance by one time step and return the new field.
    ///
    /// In the norm-conserving modes the field is renormalized afterwards to
    /// remove accumulated round-off; in absorbing mode it never is.
    pub fn step(&mut self) -> SimResult<&nd::Array1<C64>> {
        let propagator = self.strategy.propagator();
        propagator.step(&mut self.prop, &self.grid, &self.potential, &mut self.field)?;
        if propagator.conserves_norm() {
            observables::normalize(&mut self.field, self.grid.dx());
        }
        self.time += self.prop.dt() * self.time_scale;
        self.steps += 1;
        trace!(
            "step {}: t = {:.4}, norm = {:.12}",
            self.steps,
            self.time,
            observables::norm(&self.field, self.grid.dx()),
        );
        Ok(&self.field)
    }

    /// Advance by `n` time steps and return the final field.
    pub fn run(&mut self, n: usize) -> SimResult<&nd::Array1<C64>> {
        for _ in 0..n { self.step()?; }
        Ok(&self.field)
    }

    /// Advance by `n` time steps, recording the probability density before the
    /// first step and after every `stride`-th one. Rows are indexed by time.
    ///
    /// A `stride` of zero is treated as one.
    pub fn trajectory(&mut self, n: usize, stride: usize)
        -> SimResult<nd::Array2<f64>>
    {
        let stride = stride.max(1);
        let mut frames: Vec<nd::Array1<f64>> = vec![self.density()];
        for k in 1..=n {
            self.step()?;
            if k % stride == 0 { frames.push(self.density()); }
        }
        let mut out: nd::Array2<f64>
            = nd::Array2::zeros((frames.len(), self.grid.len()));
        out.outer_iter_mut().zip(&frames)
            .for_each(|(mut row, frame)| { row.assign(frame); });
        Ok(out)
    }

    /// Return a copy of `field` rescaled to unit norm on this session's grid.
    ///
    /// In absorbing mode the loss of norm is the quantity of interest, so the
    /// field is returned unscaled.
    pub fn normalize<S>(&self, field: &Arr1<S>) -> SimResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(field, self.grid.x())?;
        if self.mode == Mode::Absorbing {
            warn!("refusing to renormalize a field in absorbing mode");
            return Ok(field.to_owned());
        }
        Ok(observables::normalized(field, self.grid.dx()))
    }

    /// Summarize an arbitrary field against this session's potential and
    /// clock.
    pub fn metrics_of<S>(&self, field: &Arr1<S>) -> SimResult<Metrics>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(field, self.grid.x())?;
        Ok(self.summarize(field))
    }

    /// Summarize the current field.
    pub fn metrics(&self) -> Metrics { self.summarize(&self.field) }

    fn summarize<S>(&self, field: &Arr1<S>) -> Metrics
    where S: nd::Data<Elem = C64>
    {
        let prob = observables::density(field);
        let (transmission_pct, reflection_pct)
            = observables::transmission_of_density(&prob, &self.potential, &self.grid);
        let energy = self.packet.nominal_energy();
        Metrics {
            time: self.time,
            transmission_pct,
            reflection_pct,
            norm: observables::norm(field, self.grid.dx()),
            captured_pct: self.strategy.sink().map(Sink::efficiency_percent),
            energy,
            regime: Regime::classify(&self.potential, energy),
        }
    }

    /// Current field: `ψ(x)`, or `u(r)` in radial mode.
    pub fn field(&self) -> &nd::Array1<C64> { &self.field }

    /// Current probability density `|ψ|²`.
    pub fn density(&self) -> nd::Array1<f64> { observables::density(&self.field) }

    /// Current density split around the barrier.
    pub fn partition(&self) -> Partition {
        observables::partition_density(&self.density(), &self.potential, &self.grid)
    }

    /// Scattering regime of the current packet against the current barrier.
    pub fn regime(&self) -> Regime {
        Regime::classify(&self.potential, self.packet.nominal_energy())
    }

    /// Spatial grid.
    pub fn grid(&self) -> &Grid { &self.grid }

    /// Potential landscape.
    pub fn potential(&self) -> &Potential { &self.potential }

    /// Packet the field is reset to.
    pub fn packet(&self) -> Packet { self.packet }

    /// Active propagation mode.
    pub fn mode(&self) -> Mode { self.mode }

    /// Time step.
    pub fn dt(&self) -> f64 { self.prop.dt() }

    /// Elapsed simulation time.
    pub fn time(&self) -> f64 { self.time }

    /// Multiplier applied to `dt` when accumulating elapsed time.
    pub fn time_scale(&self) -> f64 { self.time_scale }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> usize { self.steps }

    /// The live sink, in absorbing mode only.
    pub fn sink(&self) -> Option<&Sink> { self.strategy.sink() }
}

fn initial_field(mode: Mode, packet: &Packet, grid: &Grid) -> nd::Array1<C64> {
    match mode {
        Mode::Radial => packet.radial_wavefunction(grid),
        Mode::Cartesian | Mode::Absorbing => packet.wavefunction(grid),
    }
}

// the initial norm assumes the packet starts in free space
fn warn_if_overlapping(packet: &Packet, pot: &Potential, grid: &Grid) {
    let Some((lo, hi)) = pot.extent(grid) else { return; };
    let reach = 3.0 * packet.sigma;
    if packet.x0 + reach >= lo && packet.x0 - reach <= hi {
        warn!(
            "packet at x0 = {} with sigma = {} overlaps the barrier on [{}, {}]",
            packet.x0, packet.sigma, lo, hi,
        );
    }
}
