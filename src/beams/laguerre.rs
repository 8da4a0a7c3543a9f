//! Laguerre-Gaussian modes LG_p^l, which carry orbital angular momentum l*hbar per photon.

use super::GaussianOptics;
use crate::configuration::Configuration;
use crate::constant::PI;
use crate::error::Result;
use crate::field::Field;
use crate::maths;
use nalgebra::Complex;
use tracing::debug;

/// Complex field of the Laguerre-Gaussian mode LG_p^l at longitudinal position `z`.
///
/// The radial profile is evaluated with the waist radius `w0`, while the wavefront
/// curvature and Gouy phase follow the beam to `z`. The helical phase is `exp(-i l theta)`.
///
/// # Arguments
///
/// `p`: radial index.
///
/// `l`: azimuthal index (topological charge), of either sign.
///
/// `z`: distance from the waist in m. Must be nonzero.
pub fn laguerre_gaussian(p: u32, l: i32, configuration: &Configuration, z: f64) -> Result<Field> {
    let optics = GaussianOptics::new(configuration, z)?;
    let curvature = optics.curvature()?;
    let gouy = optics.gouy_phase();
    let k = optics.wavenumber;
    let w0 = configuration.w0;
    let abs_l = l.unsigned_abs();
    let normalisation =
        (2.0 * maths::factorial(p) / (PI * maths::factorial(p + abs_l))).sqrt() / w0;

    debug!(p, l, z, "generating Laguerre-Gaussian beam");

    let (x, y) = configuration.grid()?.coordinates();
    Ok(x.zip_map(&y, |x, y| {
        let r_sq = x * x + y * y;
        let theta = y.atan2(x);
        let amplitude = normalisation
            * (2.0 * r_sq / w0.powi(2)).sqrt().powi(abs_l as i32)
            * (-r_sq / w0.powi(2)).exp()
            * maths::generalised_laguerre(p, abs_l as f64, 2.0 * r_sq / w0.powi(2));
        let phase = -(l as f64) * theta - k * r_sq / (2.0 * curvature) + gouy;
        Complex::from_polar(amplitude, phase)
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
    fn test_modes_are_normalised() {
        let configuration = small_configuration();
        for &(p, l) in &[(0, 0), (0, 1), (1, 2), (2, -1)] {
            let field = laguerre_gaussian(p, l, &configuration, configuration.z_default).unwrap();
            let power = field::energy(&field) * configuration.pixel_size.powi(2);
            assert_approx_eq!(power, 1.0, 1e-6);
        }
    }

    #[test]
    fn test_vortex_has_dark_core() {
        let configuration = small_configuration();
        let field = laguerre_gaussian(0, 3, &configuration, 1e-3).unwrap();
        let (ci, cj) = configuration.grid().unwrap().centre();
        assert_eq!(field[(ci, cj)].norm(), 0.0);
        assert!(field[(ci, cj + 10)].norm() > 0.0);
    }

    #[test]
    fn test_charge_sign_flips_helical_phase_only() {
        let configuration = small_configuration();
        let z = configuration.z_default;
        let positive = laguerre_gaussian(1, 2, &configuration, z).unwrap();
        let negative = laguerre_gaussian(1, -2, &configuration, z).unwrap();
        let (x, y) = configuration.grid().unwrap().coordinates();

        for i in (8..120).step_by(9) {
            for j in (5..123).step_by(11) {
                assert_approx_eq!(
                    positive[(i, j)].norm_sqr(),
                    negative[(i, j)].norm_sqr(),
                    1e-9 * positive[(i, j)].norm_sqr().max(1e-300)
                );
                if positive[(i, j)].norm() > 1e-3 {
                    // the ratio of the two fields is exp(-2 i l theta)
                    let ratio = positive[(i, j)] / negative[(i, j)];
                    let expected = Complex::from_polar(1.0, -4.0 * y[(i, j)].atan2(x[(i, j)]));
                    assert_approx_eq!(ratio.re, expected.re, 1e-9);
                    assert_approx_eq!(ratio.im, expected.im, 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_waist_plane_is_singular() {
        let configuration = small_configuration();
        assert!(matches!(
            laguerre_gaussian(0, 1, &configuration, 0.0),
            Err(BeamError::SingularGeometry(_))
        ));
    }
}
