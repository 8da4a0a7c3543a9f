//! Free-space propagation by the angular-spectrum method.
//!
//! A field is transformed into plane-wave components, each component is advanced by
//! `exp(i z kz)` and the result is transformed back. The longitudinal wavenumber is
//! taken as
//!
//! ```text
//! kz = sqrt(| k^2 - (2 pi fx)^2 - (2 pi fy)^2 |)
//! ```
//!
//! The absolute value keeps the transfer function a pure phase for components beyond
//! the propagating bandwidth, rather than damping them as evanescent waves. This is a
//! known physical inaccuracy, retained so that propagated fields match previously
//! published results. [AngularSpectrum::evanescent_fraction] reports how much of a
//! grid it affects.

use crate::configuration::Configuration;
use crate::constant::PI;
use crate::error::{BeamError, Result};
use crate::field::Field;
use crate::fourier::Fourier2D;
use crate::grid::Grid;
use nalgebra::{Complex, DMatrix};
use tracing::{debug, warn};

/// Angular-spectrum propagator for one grid and wavelength.
///
/// Holds the longitudinal wavenumbers and the planned transforms, so it is cheap to
/// propagate many fields, or one field to many distances.
#[derive(Clone, Debug)]
pub struct AngularSpectrum {
    grid: Grid,
    wavelength: f64,
    kz: DMatrix<f64>,
    evanescent: usize,
    fourier: Fourier2D,
}

impl AngularSpectrum {
    pub fn new(grid: Grid, wavelength: f64) -> Result<Self> {
        if !(wavelength > 0.0 && wavelength.is_finite()) {
            return Err(BeamError::invalid_parameter("wavelength", wavelength));
        }
        let (fx, fy) = grid.frequencies();
        let arguments = fx.zip_map(&fy, |fx, fy| {
            (2.0 * PI).powi(2) * (wavelength.powi(-2) - fx * fx - fy * fy)
        });
        let evanescent = arguments.iter().filter(|&&a| a < 0.0).count();
        if evanescent > 0 {
            warn!(
                evanescent,
                samples = arguments.len(),
                "spatial frequencies beyond 1/wavelength are propagated without decay"
            );
        }
        Ok(AngularSpectrum {
            grid,
            wavelength,
            kz: arguments.map(|a| a.abs().sqrt()),
            evanescent,
            fourier: Fourier2D::new(grid.shape()),
        })
    }

    /// Propagator matching a configuration's grid and wavelength.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        configuration.validate()?;
        AngularSpectrum::new(configuration.grid()?, configuration.wavelength)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Longitudinal wavenumber of every spatial-frequency sample, centred layout.
    pub fn longitudinal_wavenumbers(&self) -> &DMatrix<f64> {
        &self.kz
    }

    /// Share of spatial-frequency samples that lie beyond the propagating bandwidth.
    pub fn evanescent_fraction(&self) -> f64 {
        self.evanescent as f64 / self.kz.len() as f64
    }

    /// Transfer function `H = exp(i z kz)` in centred layout.
    pub fn transfer_function(&self, z: f64) -> Field {
        self.kz.map(|kz| Complex::from_polar(1.0, z * kz))
    }

    /// Advances `field` by the longitudinal distance `z`, which may be zero or negative.
    pub fn propagate(&self, field: &Field, z: f64) -> Result<Field> {
        if field.shape() != self.grid.shape() {
            return Err(BeamError::ShapeMismatch {
                expected: self.grid.shape(),
                actual: field.shape(),
            });
        }
        if !z.is_finite() {
            return Err(BeamError::InvalidParameters(format!(
                "propagation distance must be finite, got {}",
                z
            )));
        }
        debug!(z, shape = ?field.shape(), "angular-spectrum propagation");
        let spectrum = self
            .fourier
            .forward(field)
            .component_mul(&self.transfer_function(z));
        Ok(self.fourier.inverse(&spectrum))
    }
}

/// Propagates `field` by `z` through free space.
///
/// The frequency grid is derived from the shape of `field` and `pixel_size`.
/// Use [AngularSpectrum] directly to reuse the setup across calls.
pub fn propagate(field: &Field, z: f64, wavelength: f64, pixel_size: f64) -> Result<Field> {
    let grid = Grid::for_shape(field.shape(), pixel_size)?;
    AngularSpectrum::new(grid, wavelength)?.propagate(field, z)
}
