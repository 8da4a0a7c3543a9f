//! Synthesis, free-space propagation and turbulence perturbation of structured optical beams.
//!
//! Fields are sampled on a regular transverse [grid::Grid]. The [beams] module generates
//! Gaussian, Hermite-Gaussian, Laguerre-Gaussian and Ince-Gaussian modes; the
//! [propagation] module advances fields through free space with the angular-spectrum
//! method and draws von Karman phase screens to model atmospheric turbulence.

pub mod beams;
pub mod configuration;
pub mod constant;
pub mod dataset;
pub mod error;
pub mod field;
pub mod fourier;
pub mod grid;
pub mod maths;
pub mod output;
pub mod propagation;
pub mod session;

#[cfg(test)]
pub mod integration_tests;

pub use error::{BeamError, Result};
pub use field::{Field, PhaseScreen};
