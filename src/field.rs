//! Sampled optical fields and phase screens.

extern crate nalgebra;
use crate::error::{BeamError, Result};
use nalgebra::{Complex, DMatrix};

/// Complex scalar field sampled on a [crate::grid::Grid], shape `(size_y, size_x)`.
pub type Field = DMatrix<Complex<f64>>;

/// Real phase perturbation in radians, same shape as the [Field] it perturbs.
pub type PhaseScreen = DMatrix<f64>;

/// Intensity `|E|^2` of every sample.
pub fn intensity(field: &Field) -> DMatrix<f64> {
    field.map(|value| value.norm_sqr())
}

/// Intensity scaled so that its brightest sample equals one.
///
/// An all-dark field is returned unscaled.
pub fn normalised_intensity(field: &Field) -> DMatrix<f64> {
    let mut image = intensity(field);
    let peak = image.max();
    if peak > 0.0 {
        image /= peak;
    }
    image
}

/// Phase `arg(E)` of every sample, in `(-pi, pi]`.
pub fn phase(field: &Field) -> DMatrix<f64> {
    field.map(|value| value.arg())
}

/// Total power `sum |E|^2` over the grid.
pub fn energy(field: &Field) -> f64 {
    field.iter().map(|value| value.norm_sqr()).sum()
}

/// Multiplies `field` by `exp(i phase)` sample by sample.
pub fn apply_phase_screen(field: &Field, screen: &PhaseScreen) -> Result<Field> {
    if field.shape() != screen.shape() {
        return Err(BeamError::ShapeMismatch {
            expected: field.shape(),
            actual: screen.shape(),
        });
    }
    Ok(field.zip_map(screen, |value, phi| {
        value * Complex::from_polar(1.0, phi)
    }))
}

/// Lifts a real amplitude array into a field with zero phase.
pub fn from_real(amplitude: &DMatrix<f64>) -> Field {
    amplitude.map(|value| Complex::new(value, 0.0))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::constant::PI;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_intensity_and_energy() {
        let field = DMatrix::from_row_slice(
            1,
            3,
            &[
                Complex::new(1.0, 1.0),
                Complex::new(0.0, -2.0),
                Complex::new(3.0, 0.0),
            ],
        );
        let image = intensity(&field);
        assert_approx_eq!(image[(0, 0)], 2.0, 1e-12);
        assert_approx_eq!(image[(0, 1)], 4.0, 1e-12);
        assert_approx_eq!(energy(&field), 15.0, 1e-12);
        let normalised = normalised_intensity(&field);
        assert_approx_eq!(normalised[(0, 2)], 1.0, 1e-12);
        assert_approx_eq!(normalised[(0, 0)], 2.0 / 9.0, 1e-12);
    }

    #[test]
    fn test_dark_field_normalisation() {
        let field = DMatrix::from_element(2, 2, Complex::new(0.0, 0.0));
        assert_eq!(normalised_intensity(&field), DMatrix::zeros(2, 2));
    }

    #[test]
    fn test_apply_phase_screen() {
        let field = from_real(&DMatrix::from_element(2, 2, 2.0));
        let screen = DMatrix::from_row_slice(2, 2, &[0.0, PI / 2.0, PI, -PI / 2.0]);
        let shifted = apply_phase_screen(&field, &screen).unwrap();
        assert_approx_eq!(shifted[(0, 1)].im, 2.0, 1e-12);
        assert_approx_eq!(shifted[(1, 0)].re, -2.0, 1e-12);
        assert_approx_eq!(energy(&shifted), energy(&field), 1e-12);
        assert_approx_eq!(phase(&shifted)[(1, 1)], -PI / 2.0, 1e-12);
    }

    #[test]
    fn test_apply_phase_screen_shape_mismatch() {
        let field = from_real(&DMatrix::from_element(2, 3, 1.0));
        let screen = DMatrix::zeros(3, 2);
        match apply_phase_screen(&field, &screen) {
            Err(BeamError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, (2, 3));
                assert_eq!(actual, (3, 2));
            }
            _ => panic!("expected a shape mismatch"),
        }
    }
}
