//! Propagation of fields through free space and turbulent media.

pub mod free_space;
pub mod turbulence;

pub use free_space::{propagate, AngularSpectrum};
pub use turbulence::{
    fried_parameter, generate_phase_screen, generate_phase_screen_with_rng,
    generate_phase_screens, von_karman_psd, PhaseScreenGenerator, TurbulenceParameters,
};
