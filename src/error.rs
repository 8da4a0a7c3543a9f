//! Error types shared by the beam generators, propagators and file helpers.

use std::io;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, BeamError>;

/// Errors raised by the beam simulation.
///
/// All variants are raised while validating inputs, before any numerical work is done.
/// Nothing here is transient; retrying the same call gives the same error.
#[derive(Error, Debug)]
pub enum BeamError {
    /// Mode indices outside the domain of a beam family.
    #[error("invalid mode index: {0}")]
    InvalidModeIndex(String),

    /// A valid mode request that this crate does not implement.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Evaluation where the wavefront curvature is undefined.
    #[error("singular geometry: {0}")]
    SingularGeometry(String),

    /// Non-positive or non-finite physical or grid parameters.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A numerical routine failed to produce finite results.
    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    /// Two arrays that must share a grid do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BeamError {
    pub(crate) fn invalid_parameter(name: &str, value: f64) -> Self {
        BeamError::InvalidParameters(format!(
            "`{}` must be positive and finite, got {}",
            name, value
        ))
    }
}
