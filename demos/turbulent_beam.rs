//! Sends a Laguerre-Gaussian vortex beam through a turbulent phase screen and writes the
//! propagated intensity to file.
//!
//! Run with `cargo run --example turbulent_beam -- [configuration.yaml]`.

extern crate beamsim as lib;

use lib::configuration::Configuration;
use lib::field;
use lib::output;
use lib::session::Session;
use std::time::Instant;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();
    let now = Instant::now();

    // Load parameters from the file given on the command line, if any.
    let configuration = match std::env::args().nth(1) {
        Some(path) => Configuration::load(path).expect("could not load configuration"),
        None => Configuration::default(),
    };
    let mut session = Session::new(configuration).expect("invalid configuration");

    // Vortex beam with unit topological charge.
    let beam = session.laguerre_gaussian(0, 1).unwrap();
    output::write_csv("clean_intensity.csv", &field::normalised_intensity(&beam)).unwrap();

    // One realisation of turbulence, then 0.4 m of free space.
    let screen = session.turbulence();
    output::write_csv("phase_screen.csv", &screen).unwrap();
    let distorted = field::apply_phase_screen(&beam, &screen).unwrap();
    let received = session.propagate(&distorted, Some(0.4)).unwrap();
    output::write_csv("turbulent_intensity.csv", &field::normalised_intensity(&received))
        .unwrap();

    info!(
        elapsed_ms = now.elapsed().as_millis() as u64,
        "wrote clean_intensity.csv, phase_screen.csv and turbulent_intensity.csv"
    );
}
