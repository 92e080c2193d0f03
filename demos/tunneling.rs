use std::path::PathBuf;
use qtunnel::{
    Barrier,
    Mode,
    Session,
    SimConfig,
    observables::Metrics,
    potential::V_INFINITY,
};

// send a Gaussian packet at a few barrier landscapes and print the scattering
// summary as it goes
//
// usage: cargo run --example tunneling [config.toml]
// set RUST_LOG=debug (or trace) for session logs

const STEPS: usize = 350; // packet clears the barrier before reaching the edge
const REPORT_EVERY: usize = 50;

fn report(label: &str, m: &Metrics) {
    let captured
        = m.captured_pct
        .map(|c| format!("  captured = {:6.2}%", c))
        .unwrap_or_default();
    println!(
        "{:<14} t = {:6.2}  T = {:6.2}%  R = {:6.2}%  norm = {:.6}{}  [{}]",
        label,
        m.time,
        m.transmission_pct,
        m.reflection_pct,
        m.norm,
        captured,
        m.regime.label(),
    );
}

fn evolve(label: &str, session: &mut Session) {
    session.reset();
    report(label, &session.metrics());
    for _ in 0..STEPS / REPORT_EVERY {
        session.run(REPORT_EVERY).unwrap();
        report(label, &session.metrics());
    }
    println!();
}

fn main() {
    env_logger::init();

    let config
        = match std::env::args().nth(1) {
            Some(path) => SimConfig::load(PathBuf::from(path)).unwrap(),
            None => SimConfig::default(),
        };
    println!("{}", config.to_toml_string().unwrap());
    let mut session = Session::new(config).unwrap();
    let base = session.potential().barrier();
    let center
        = match base {
            Barrier::None => 10.0,
            Barrier::Single { center, .. }
            | Barrier::HardWall { center, .. }
            | Barrier::Double { center, .. } => center,
        };

    evolve("configured", &mut session);

    // E = 4.5 against V = 5: tunneling
    session.configure_barrier(
        Barrier::Single { height: 5.0, width: 1.0, center }).unwrap();
    evolve("thin barrier", &mut session);

    session.set_barrier_height(V_INFINITY).unwrap();
    evolve("hard wall", &mut session);

    session.configure_barrier(
        Barrier::Double { height: 5.0, width: 0.5, gap: 3.0, center }).unwrap();
    evolve("double", &mut session);

    session.configure_barrier(base).unwrap();
    session.set_mode(Mode::Radial);
    evolve(Mode::Radial.label(), &mut session);

    session.set_mode(Mode::Absorbing);
    evolve(Mode::Absorbing.label(), &mut session);
    if let Some(sink) = session.sink() {
        println!(
            "sink at {} (width {}, strength {}): efficiency {:.2}%",
            sink.center(),
            sink.width(),
            sink.strength(),
            sink.efficiency_percent(),
        );
    }
}
