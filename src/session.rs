//! A session bundles one configuration with the state derived from it.
//!
//! All generators take the configuration explicitly; a [Session] saves passing it
//! around and keeps the propagator, phase-screen generator and random number
//! generator alive between calls.

use crate::beams::{self, BeamMode, Parity};
use crate::configuration::Configuration;
use crate::error::Result;
use crate::field::{self, Field, PhaseScreen};
use crate::propagation::{AngularSpectrum, PhaseScreenGenerator, TurbulenceParameters};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub struct Session {
    configuration: Configuration,
    propagator: AngularSpectrum,
    turbulence: PhaseScreenGenerator,
    rng: StdRng,
}

impl Session {
    /// Opens a session with a random number generator seeded from entropy.
    pub fn new(configuration: Configuration) -> Result<Self> {
        Session::with_rng(configuration, StdRng::from_entropy())
    }

    /// Opens a session whose phase screens are reproducible for a given `seed`.
    pub fn seeded(configuration: Configuration, seed: u64) -> Result<Self> {
        Session::with_rng(configuration, StdRng::seed_from_u64(seed))
    }

    fn with_rng(configuration: Configuration, rng: StdRng) -> Result<Self> {
        configuration.validate()?;
        info!("opening session\n{}", configuration);
        Ok(Session {
            propagator: AngularSpectrum::from_configuration(&configuration)?,
            turbulence: PhaseScreenGenerator::from_configuration(&configuration)?,
            configuration,
            rng,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn gaussian(&self) -> Result<Field> {
        beams::gaussian(&self.configuration)
    }

    /// Hermite-Gaussian mode at the default position.
    pub fn hermite_gaussian(&self, n: u32, m: u32) -> Result<Field> {
        beams::hermite_gaussian(n, m, &self.configuration, self.configuration.z_default)
    }

    /// Laguerre-Gaussian mode at the default position.
    pub fn laguerre_gaussian(&self, p: u32, l: i32) -> Result<Field> {
        beams::laguerre_gaussian(p, l, &self.configuration, self.configuration.z_default)
    }

    /// Ince-Gaussian mode at the default position.
    pub fn ince_gaussian(
        &self,
        p: u32,
        m: u32,
        parity: Parity,
        elliptic_parameter: Option<f64>,
    ) -> Result<Field> {
        beams::ince_gaussian(
            p,
            m,
            parity,
            elliptic_parameter,
            &self.configuration,
            self.configuration.z_default,
        )
    }

    pub fn mode(&self, mode: &BeamMode) -> Result<Field> {
        mode.generate(&self.configuration)
    }

    /// Propagates `field` by `z`, or by the default distance when `z` is `None`.
    pub fn propagate(&self, field: &Field, z: Option<f64>) -> Result<Field> {
        self.propagator
            .propagate(field, z.unwrap_or(self.configuration.z_default))
    }

    /// Draws the next phase screen from the session's generator.
    pub fn turbulence(&mut self) -> PhaseScreen {
        self.turbulence.generate(&mut self.rng)
    }

    /// Draws a phase screen with turbulence parameters other than the configured ones.
    pub fn turbulence_with(&mut self, parameters: &TurbulenceParameters) -> Result<PhaseScreen> {
        let generator = PhaseScreenGenerator::new(
            *self.propagator.grid(),
            self.configuration.wavelength,
            parameters,
        )?;
        Ok(generator.generate(&mut self.rng))
    }

    /// Applies a fresh phase screen to `field` and propagates it by `z`.
    pub fn through_turbulence(&mut self, field: &Field, z: Option<f64>) -> Result<Field> {
        let screen = self.turbulence();
        self.propagate(&field::apply_phase_screen(field, &screen)?, z)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn small_configuration() -> Configuration {
        Configuration {
            size_x: 64,
            size_y: 64,
            pixel_size: 8e-6,
            w0: 80e-6,
            ..Default::default()
        }
    }

    #[test]
    fn test_session_generators_use_configuration() {
        let configuration = small_configuration();
        let session = Session::new(configuration.clone()).unwrap();
        assert_eq!(session.gaussian().unwrap(), beams::gaussian(&configuration).unwrap());
        assert_eq!(
            session.laguerre_gaussian(0, 1).unwrap(),
            beams::laguerre_gaussian(0, 1, &configuration, configuration.z_default).unwrap()
        );
        assert_eq!(
            session
                .mode(&BeamMode::HermiteGaussian { n: 1, m: 0 })
                .unwrap(),
            session.hermite_gaussian(1, 0).unwrap()
        );
        assert_eq!(
            session.ince_gaussian(2, 2, Parity::Even, None).unwrap().shape(),
            (64, 64)
        );
    }

    #[test]
    fn test_default_propagation_distance() {
        let session = Session::new(small_configuration()).unwrap();
        let beam = session.gaussian().unwrap();
        assert_eq!(
            session.propagate(&beam, None).unwrap(),
            session.propagate(&beam, Some(1e-2)).unwrap()
        );
    }

    #[test]
    fn test_seeded_sessions_repeat() {
        let mut a = Session::seeded(small_configuration(), 42).unwrap();
        let mut b = Session::seeded(small_configuration(), 42).unwrap();
        let first = a.turbulence();
        assert_eq!(first, b.turbulence());
        assert_ne!(first, a.turbulence());
    }

    #[test]
    fn test_turbulence_preserves_energy() {
        let mut session = Session::seeded(small_configuration(), 3).unwrap();
        let beam = session.gaussian().unwrap();
        let distorted = session.through_turbulence(&beam, Some(0.2)).unwrap();
        assert_approx_eq!(
            field::energy(&distorted),
            field::energy(&beam),
            1e-9 * field::energy(&beam)
        );

        let strong = TurbulenceParameters::from_configuration(session.configuration())
            .with_cn2(1e-11);
        assert_eq!(session.turbulence_with(&strong).unwrap().shape(), (64, 64));
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let configuration = Configuration {
            wavelength: -1.0,
            ..Default::default()
        };
        assert!(Session::new(configuration).is_err());
    }
}
