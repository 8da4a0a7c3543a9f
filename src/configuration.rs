//! Defines the parameter bundle consumed by every beam generator, propagator and
//! phase-screen generator.
//!
//! A [Configuration] is plain data. It is passed explicitly to each entry point;
//! there is no process-wide default. [crate::session::Session] wraps one for callers
//! that want short call sites.

use crate::constant::PI;
use crate::error::{BeamError, Result};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Grid and physical parameters of a simulation.
///
/// Fields missing from a YAML or JSON file take their [Default] value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Configuration {
    /// Wavelength of the light, SI units of m.
    pub wavelength: f64,

    /// Number of samples along x.
    pub size_x: usize,

    /// Number of samples along y.
    pub size_y: usize,

    /// Sample pitch of the transverse grid, SI units of m.
    pub pixel_size: f64,

    /// Beam waist, radius at which the field amplitude falls to 1/e, SI units of m.
    pub w0: f64,

    /// Longitudinal position used when a generator is not given one, SI units of m.
    pub z_default: f64,

    /// Refractive-index structure constant, units of m^(-2/3).
    pub cn2: f64,

    /// Outer scale of turbulence, SI units of m.
    pub l_max: f64,

    /// Inner scale of turbulence, SI units of m.
    pub l_min: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            wavelength: 810e-9,
            size_x: 300,
            size_y: 300,
            pixel_size: 8e-6,
            w0: 0.45e-3,
            z_default: 1e-2,
            cn2: 3e-13,
            l_max: 1e-1,
            l_min: 1e-3,
        }
    }
}

impl Configuration {
    /// Checks that every parameter is usable.
    ///
    /// All lengths and the structure constant must be positive and finite, and the
    /// Rayleigh range derived from `w0` and `wavelength` must be finite and nonzero.
    pub fn validate(&self) -> Result<()> {
        Grid::new(self.size_x, self.size_y, self.pixel_size)?;
        for &(name, value) in &[
            ("wavelength", self.wavelength),
            ("w0", self.w0),
            ("z_default", self.z_default),
            ("cn2", self.cn2),
            ("l_max", self.l_max),
            ("l_min", self.l_min),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(BeamError::invalid_parameter(name, value));
            }
        }
        let rayleigh_range = self.rayleigh_range();
        if !(rayleigh_range > 0.0 && rayleigh_range.is_finite()) {
            return Err(BeamError::InvalidParameters(format!(
                "Rayleigh range must be finite and nonzero, got {}",
                rayleigh_range
            )));
        }
        Ok(())
    }

    /// The validated sampling grid.
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.size_x, self.size_y, self.pixel_size)
    }

    /// Wavenumber k = 2 pi / wavelength, units of 1/m.
    pub fn wavenumber(&self) -> f64 {
        2.0 * PI / self.wavelength
    }

    /// Rayleigh range zR = pi w0^2 / wavelength, SI units of m.
    pub fn rayleigh_range(&self) -> f64 {
        PI * self.w0.powi(2) / self.wavelength
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let configuration: Configuration = serde_yaml::from_str(contents)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let configuration: Configuration = serde_json::from_str(contents)?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Loads a configuration file, choosing the format from the extension.
    ///
    /// `.json` files are read as JSON; anything else is read as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Configuration::from_json_str(&contents),
            _ => Configuration::from_yaml_str(&contents),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Beam simulation configuration:")?;
        writeln!(f, "  Wavelength: {:.1} nm", self.wavelength * 1e9)?;
        writeln!(f, "  Beam waist (w0): {:.3} mm", self.w0 * 1e3)?;
        writeln!(f, "  Size: {} x {} px", self.size_x, self.size_y)?;
        write!(f, "  Pixel size: {:.2} um", self.pixel_size * 1e6)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_default_is_valid() {
        let configuration = Configuration::default();
        assert!(configuration.validate().is_ok());
        assert_approx_eq!(configuration.rayleigh_range(), 0.785398, 1e-5);
        assert_eq!(configuration.grid().unwrap().shape(), (300, 300));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut configuration = Configuration::default();
        configuration.wavelength = 0.0;
        assert!(matches!(
            configuration.validate(),
            Err(BeamError::InvalidParameters(_))
        ));

        let mut configuration = Configuration::default();
        configuration.w0 = -1e-3;
        assert!(configuration.validate().is_err());

        let mut configuration = Configuration::default();
        configuration.size_y = 0;
        assert!(configuration.validate().is_err());

        let mut configuration = Configuration::default();
        configuration.l_min = f64::INFINITY;
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let configuration = Configuration::from_yaml_str("size_x: 64\nsize_y: 32\nw0: 1.0e-4\n")
            .unwrap();
        assert_eq!(configuration.size_x, 64);
        assert_eq!(configuration.size_y, 32);
        assert_approx_eq!(configuration.w0, 1e-4, 1e-18);
        assert_approx_eq!(configuration.wavelength, 810e-9, 1e-18);
    }

    #[test]
    fn test_json_round_trip() {
        let configuration = Configuration {
            size_x: 128,
            cn2: 1e-14,
            ..Default::default()
        };
        let text = serde_json::to_string(&configuration).unwrap();
        assert_eq!(Configuration::from_json_str(&text).unwrap(), configuration);
    }

    #[test]
    fn test_invalid_file_contents_are_rejected() {
        assert!(Configuration::from_json_str("{\"pixel_size\": -1.0}").is_err());
        assert!(Configuration::from_yaml_str("size_x: [1, 2]").is_err());
    }

    #[test]
    fn test_display() {
        let text = format!("{}", Configuration::default());
        assert!(text.contains("810.0 nm"));
        assert!(text.contains("0.450 mm"));
        assert!(text.contains("300 x 300 px"));
    }
}
