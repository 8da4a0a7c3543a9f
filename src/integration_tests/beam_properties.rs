//! Integration tests for the beam generators
//!
//! This module checks the generated modes against each other and against the behaviour of
//! the propagator on the default grid.

#[cfg(test)]
pub mod tests {
    use crate::beams::{self, BeamMode, Parity};
    use crate::configuration::Configuration;
    use crate::error::BeamError;
    use crate::field;
    use crate::fourier;
    use crate::propagation::AngularSpectrum;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn fundamental_modes_share_gaussian_profile() {
        let configuration = Configuration::default();
        let z = configuration.z_default;
        let hermite = beams::hermite_gaussian(0, 0, &configuration, z).unwrap();
        let laguerre = beams::laguerre_gaussian(0, 0, &configuration, z).unwrap();
        let gaussian = beams::gaussian(&configuration).unwrap();

        let hermite_peak = hermite.map(|v| v.norm()).max();
        let laguerre_peak = laguerre.map(|v| v.norm()).max();
        for ((h, l), g) in hermite.iter().zip(laguerre.iter()).zip(gaussian.iter()) {
            let g = g.norm();
            if g > 0.05 {
                // w(z) differs from w0 by under 1e-4 at the default distance
                assert_approx_eq!(h.norm() / hermite_peak, g, 1e-3 * g);
                assert_approx_eq!(l.norm() / laguerre_peak, g, 1e-6 * g);
            }
        }
    }

    #[test]
    fn laguerre_charge_sign_preserves_intensity() {
        let configuration = Configuration::default();
        let positive = BeamMode::LaguerreGaussian { p: 1, l: 2 }
            .generate(&configuration)
            .unwrap();
        let negative = BeamMode::LaguerreGaussian { p: 1, l: -2 }
            .generate(&configuration)
            .unwrap();
        let difference = field::intensity(&positive) - field::intensity(&negative);
        assert!(difference.amax() < 1e-9 * field::intensity(&positive).max());
        assert!(field::phase(&positive) != field::phase(&negative));
    }

    #[test]
    fn ince_gaussian_on_default_grid() {
        let configuration = Configuration::default();
        let field = beams::ince_gaussian(2, 2, Parity::Even, None, &configuration, configuration.z_default)
            .unwrap();
        assert_eq!(field.shape(), (configuration.size_y, configuration.size_x));
        assert!(field.iter().all(|v| v.re.is_finite() && v.im.is_finite()));
        assert!(field::energy(&field) > 0.0);

        assert!(matches!(
            beams::ince_gaussian(3, 2, Parity::Even, None, &configuration, 0.0),
            Err(BeamError::InvalidModeIndex(_))
        ));
        assert!(matches!(
            beams::ince_gaussian(2, 2, Parity::Odd, None, &configuration, 0.0),
            Err(BeamError::NotSupported(_))
        ));
    }

    #[test]
    fn centred_transform_round_trips_beams() {
        let configuration = Configuration {
            size_x: 90,
            size_y: 75,
            ..Default::default()
        };
        let beam = beams::hermite_gaussian(2, 1, &configuration, 0.3).unwrap();
        let back = fourier::inverse(&fourier::forward(&beam));
        let scale = beam.camax();
        for (a, b) in beam.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-9 * scale);
        }
    }

    #[test]
    fn propagation_conserves_energy_of_every_family() {
        let configuration = Configuration {
            size_x: 128,
            size_y: 128,
            ..Default::default()
        };
        let propagator = AngularSpectrum::from_configuration(&configuration).unwrap();
        let modes = [
            BeamMode::Gaussian,
            BeamMode::HermiteGaussian { n: 1, m: 2 },
            BeamMode::LaguerreGaussian { p: 0, l: 3 },
            BeamMode::InceGaussian {
                p: 4,
                m: 2,
                parity: Parity::Even,
                elliptic_parameter: Some(2.0),
            },
        ];
        for mode in modes.iter() {
            let beam = mode.generate(&configuration).unwrap();
            let before = field::energy(&beam);
            let after = field::energy(&propagator.propagate(&beam, 0.4).unwrap());
            assert_approx_eq!(after, before, 1e-9 * before);
        }
    }
}
