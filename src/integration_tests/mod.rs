//! Tests spanning several modules.

pub mod beam_properties;
pub mod turbulent_propagation;
