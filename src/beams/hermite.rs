//! Hermite-Gaussian modes HG_nm.

use super::GaussianOptics;
use crate::configuration::Configuration;
use crate::constant::PI;
use crate::error::Result;
use crate::field::Field;
use crate::maths;
use nalgebra::Complex;
use tracing::debug;

/// Complex field of the Hermite-Gaussian mode HG_nm at longitudinal position `z`.
///
/// # Arguments
///
/// `n`: order of the Hermite polynomial along x.
///
/// `m`: order of the Hermite polynomial along y.
///
/// `z`: distance from the waist in m. Must be nonzero, since the wavefront curvature
/// term diverges at the waist.
pub fn hermite_gaussian(n: u32, m: u32, configuration: &Configuration, z: f64) -> Result<Field> {
    let optics = GaussianOptics::new(configuration, z)?;
    let curvature = optics.curvature()?;
    let w = optics.spot_size();
    let k = optics.wavenumber;
    let gouy = (n + m + 1) as f64 * optics.gouy_phase();
    let normalisation = (2.0
        / (PI
            * w.powi(2)
            * 2.0_f64.powi((n + m) as i32)
            * maths::factorial(n)
            * maths::factorial(m)))
    .sqrt();

    debug!(n, m, z, spot_size = w, "generating Hermite-Gaussian beam");

    let (x, y) = configuration.grid()?.coordinates();
    Ok(x.zip_map(&y, |x, y| {
        let r_sq = x * x + y * y;
        let amplitude = maths::hermite(n, 2.0_f64.sqrt() * x / w)
            * maths::hermite(m, 2.0_f64.sqrt() * y / w)
            * (-r_sq / w.powi(2)).exp();
        let phase = k * r_sq / (2.0 * curvature) - gouy;
        Complex::from_polar(normalisation * amplitude, phase)
    }))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::error::BeamError;
    use crate::field;
    use assert_approx_eq::assert_approx_eq;

    fn small_configuration() -> Configuration {
        Configuration {
            size_x: 128,
            size_y: 128,
            pixel_size: 4e-6,
            w0: 40e-6,
            ..Default::default()
        }
    }

    #[test]
    fn test_fundamental_mode_is_normalised() {
        let configuration = small_configuration();
        let field = hermite_gaussian(0, 0, &configuration, configuration.z_default).unwrap();
        let power = field::energy(&field) * configuration.pixel_size.powi(2);
        assert_approx_eq!(power, 1.0, 1e-6);
    }

    #[test]
    fn test_higher_modes_are_normalised() {
        let configuration = small_configuration();
        for &(n, m) in &[(1, 0), (2, 1), (3, 3)] {
            let field = hermite_gaussian(n, m, &configuration, 1e-3).unwrap();
            let power = field::energy(&field) * configuration.pixel_size.powi(2);
            assert_approx_eq!(power, 1.0, 1e-5);
        }
    }

    #[test]
    fn test_odd_order_has_node_on_axis() {
        let configuration = small_configuration();
        let field = hermite_gaussian(1, 0, &configuration, 1e-3).unwrap();
        let (ci, cj) = configuration.grid().unwrap().centre();
        assert_approx_eq!(field[(ci, cj)].norm(), 0.0, 1e-12);
        assert_approx_eq!(field[(ci + 5, cj)].norm(), 0.0, 1e-12);
        assert!(field[(ci, cj + 5)].norm() > 0.0);
        // antisymmetric in x
        assert_approx_eq!(
            (field[(ci, cj + 5)] + field[(ci, cj - 5)]).norm(),
            0.0,
            1e-9
        );
    }

    #[test]
    fn test_on_axis_phase_is_gouy_shift() {
        let configuration = small_configuration();
        let z = 2e-3;
        let field = hermite_gaussian(2, 0, &configuration, z).unwrap();
        let optics = GaussianOptics::new(&configuration, z).unwrap();
        let (ci, cj) = configuration.grid().unwrap().centre();
        // H_2(0) = -2 adds a pi to the phase
        let expected = Complex::from_polar(1.0, PI - 3.0 * optics.gouy_phase());
        let value = field[(ci, cj)] / field[(ci, cj)].norm();
        assert_approx_eq!(value.re, expected.re, 1e-9);
        assert_approx_eq!(value.im, expected.im, 1e-9);
    }

    #[test]
    fn test_waist_plane_is_singular() {
        let configuration = small_configuration();
        assert!(matches!(
            hermite_gaussian(0, 0, &configuration, 0.0),
            Err(BeamError::SingularGeometry(_))
        ));
    }
}
