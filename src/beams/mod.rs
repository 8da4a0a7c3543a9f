//! Generators for Gaussian-family beams.
//!
//! Each generator maps mode indices and a [Configuration] to a complex [Field]
//! sampled on the configuration's grid. [BeamMode] collects the four families behind
//! one value so that callers can store and dispatch mode requests.

pub mod gaussian;
pub mod hermite;
pub mod ince;
pub mod laguerre;

use crate::configuration::Configuration;
use crate::error::{BeamError, Result};
use crate::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use gaussian::gaussian;
pub use hermite::hermite_gaussian;
pub use ince::ince_gaussian;
pub use laguerre::laguerre_gaussian;

/// Quantities of a Gaussian beam that depend only on the waist, wavelength and
/// longitudinal position.
#[derive(Clone, Copy, Debug)]
pub struct GaussianOptics {
    /// wavenumber in 1/m
    pub wavenumber: f64,

    /// Waist radius in m
    pub waist: f64,

    /// The distance along the propagation direction of a beam from the
    ///  waist to the place where the area of the cross section is doubled in units of metres
    pub rayleigh_range: f64,

    /// Longitudinal position relative to the waist, in m
    pub z: f64,
}

impl GaussianOptics {
    pub fn new(configuration: &Configuration, z: f64) -> Result<Self> {
        configuration.validate()?;
        if !z.is_finite() {
            return Err(BeamError::InvalidParameters(format!(
                "propagation distance must be finite, got {}",
                z
            )));
        }
        let wavenumber = configuration.wavenumber();
        Ok(GaussianOptics {
            wavenumber,
            waist: configuration.w0,
            rayleigh_range: wavenumber * configuration.w0.powi(2) / 2.0,
            z,
        })
    }

    /// Beam radius w(z).
    pub fn spot_size(&self) -> f64 {
        self.waist * (1.0 + (self.z / self.rayleigh_range).powi(2)).sqrt()
    }

    /// Gouy phase arctan(z / zR).
    pub fn gouy_phase(&self) -> f64 {
        (self.z / self.rayleigh_range).atan()
    }

    /// Wavefront radius of curvature R(z), which diverges at the waist.
    pub fn curvature(&self) -> Result<f64> {
        if self.z == 0.0 {
            return Err(BeamError::SingularGeometry(
                "wavefront curvature is undefined at z = 0".to_string(),
            ));
        }
        Ok(self.z * (1.0 + (self.rayleigh_range / self.z).powi(2)))
    }
}

/// Parity of an Ince-Gaussian mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    #[serde(rename = "e")]
    Even,
    #[serde(rename = "o")]
    Odd,
}

impl FromStr for Parity {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "e" | "even" => Ok(Parity::Even),
            "o" | "odd" => Ok(Parity::Odd),
            other => Err(BeamError::InvalidModeIndex(format!(
                "unknown Ince-Gaussian parity `{}`",
                other
            ))),
        }
    }
}

/// A request for one transverse mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum BeamMode {
    Gaussian,
    HermiteGaussian {
        n: u32,
        m: u32,
    },
    LaguerreGaussian {
        p: u32,
        l: i32,
    },
    InceGaussian {
        p: u32,
        m: u32,
        parity: Parity,
        #[serde(default)]
        elliptic_parameter: Option<f64>,
    },
}

impl BeamMode {
    /// Short family name, e.g. `LG`.
    pub fn family(&self) -> &'static str {
        match self {
            BeamMode::Gaussian => "G",
            BeamMode::HermiteGaussian { .. } => "HG",
            BeamMode::LaguerreGaussian { .. } => "LG",
            BeamMode::InceGaussian { .. } => "IG",
        }
    }

    /// Label of the mode indices, e.g. `p0_l1`.
    pub fn order_label(&self) -> String {
        match self {
            BeamMode::Gaussian => "00".to_string(),
            BeamMode::HermiteGaussian { n, m } => format!("n{}_m{}", n, m),
            BeamMode::LaguerreGaussian { p, l } => format!("p{}_l{}", p, l),
            BeamMode::InceGaussian { p, m, .. } => format!("p{}_m{}", p, m),
        }
    }

    /// Generates the mode at the configuration's default position.
    pub fn generate(&self, configuration: &Configuration) -> Result<Field> {
        self.generate_at(configuration, configuration.z_default)
    }

    /// Generates the mode at longitudinal position `z`.
    ///
    /// The Gaussian mode is the waist-plane field and ignores `z`.
    pub fn generate_at(&self, configuration: &Configuration, z: f64) -> Result<Field> {
        match *self {
            BeamMode::Gaussian => gaussian(configuration),
            BeamMode::HermiteGaussian { n, m } => hermite_gaussian(n, m, configuration, z),
            BeamMode::LaguerreGaussian { p, l } => laguerre_gaussian(p, l, configuration, z),
            BeamMode::InceGaussian {
                p,
                m,
                parity,
                elliptic_parameter,
            } => ince_gaussian(p, m, parity, elliptic_parameter, configuration, z),
        }
    }
}

impl fmt::Display for BeamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family(), self.order_label())
    }
}
