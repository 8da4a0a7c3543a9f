//! Integration tests for propagation through turbulence
//!
//! A beam is perturbed by a phase screen and then propagated, as when building datasets.

#[cfg(test)]
pub mod tests {
    use crate::beams;
    use crate::configuration::Configuration;
    use crate::field;
    use crate::propagation::{self, AngularSpectrum, TurbulenceParameters};
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn configuration() -> Configuration {
        Configuration {
            size_x: 96,
            size_y: 96,
            pixel_size: 10e-6,
            w0: 120e-6,
            ..Default::default()
        }
    }

    #[test]
    fn phase_screen_only_changes_phase() {
        let configuration = configuration();
        let grid = configuration.grid().unwrap();
        let beam = beams::laguerre_gaussian(0, 1, &configuration, configuration.z_default).unwrap();
        let screen = propagation::generate_phase_screen_with_rng(
            &grid,
            configuration.wavelength,
            &TurbulenceParameters::from_configuration(&configuration),
            &mut StdRng::seed_from_u64(21),
        )
        .unwrap();
        let distorted = field::apply_phase_screen(&beam, &screen).unwrap();
        for (a, b) in beam.iter().zip(distorted.iter()) {
            assert_approx_eq!(a.norm(), b.norm(), 1e-12 * beam.camax());
        }
    }

    #[test]
    fn stronger_turbulence_distorts_more() {
        let configuration = configuration();
        let grid = configuration.grid().unwrap();
        let propagator = AngularSpectrum::from_configuration(&configuration).unwrap();
        let beam = beams::gaussian(&configuration).unwrap();
        let clean = field::normalised_intensity(&propagator.propagate(&beam, 0.4).unwrap());

        let parameters = TurbulenceParameters::from_configuration(&configuration)
            .with_scales(1e-3, 25.0);
        let mut distortion = Vec::new();
        for &cn2 in &[1e-16, 1e-12] {
            // same noise for both strengths
            let screen = propagation::generate_phase_screen_with_rng(
                &grid,
                configuration.wavelength,
                &parameters.with_cn2(cn2),
                &mut StdRng::seed_from_u64(8),
            )
            .unwrap();
            let distorted = field::apply_phase_screen(&beam, &screen).unwrap();
            let image = field::normalised_intensity(&propagator.propagate(&distorted, 0.4).unwrap());
            distortion.push((image - &clean).norm());
        }
        assert!(distortion[0] < distortion[1]);
    }
}
