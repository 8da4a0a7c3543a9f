//! Fundamental Gaussian beam at its waist.

use crate::configuration::Configuration;
use crate::error::Result;
use crate::field::Field;
use nalgebra::Complex;
use tracing::debug;

/// Field `exp(-(x^2 + y^2) / w0^2)` of a Gaussian beam in its waist plane.
///
/// The field is real, has unit peak amplitude at the grid origin and does not depend
/// on any propagation distance.
pub fn gaussian(configuration: &Configuration) -> Result<Field> {
    configuration.validate()?;
    let (x, y) = configuration.grid()?.coordinates();
    let w0_sq = configuration.w0.powi(2);
    debug!(
        shape = ?x.shape(),
        w0 = configuration.w0,
        "generating Gaussian beam"
    );
    Ok(x.zip_map(&y, |x, y| {
        Complex::new((-(x * x + y * y) / w0_sq).exp(), 0.0)
    }))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::constant::EXP;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_peak_and_waist_amplitude() {
        let configuration = Configuration {
            size_x: 64,
            size_y: 48,
            pixel_size: 8e-6,
            w0: 80e-6,
            ..Default::default()
        };
        let field = gaussian(&configuration).unwrap();
        let (ci, cj) = configuration.grid().unwrap().centre();
        assert_eq!(field[(ci, cj)], Complex::new(1.0, 0.0));
        // w0 is exactly ten pixels from the origin
        assert_approx_eq!(field[(ci, cj + 10)].re, 1.0 / EXP, 1e-12);
        assert_approx_eq!(field[(ci - 10, cj)].re, 1.0 / EXP, 1e-12);
        assert_approx_eq!(field[(ci + 6, cj + 8)].re, 1.0 / EXP, 1e-12);
    }

    #[test]
    fn test_default_peak_is_exactly_one() {
        let configuration = Configuration::default();
        let field = gaussian(&configuration).unwrap();
        assert_eq!(field.shape(), (300, 300));
        assert_eq!(field[(150, 150)].re, 1.0);
        let peak = field.iter().map(|v| v.re).fold(f64::MIN, f64::max);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn test_rejects_invalid_waist() {
        let configuration = Configuration {
            w0: 0.0,
            ..Default::default()
        };
        assert!(gaussian(&configuration).is_err());
    }
}
