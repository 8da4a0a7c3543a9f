//! Random phase screens for atmospheric turbulence.
//!
//! Screens are synthesised in the spectral domain: complex white Gaussian noise is
//! shaped by the square root of the von Karman phase power spectral density and
//! transformed back to the spatial domain.

use crate::configuration::Configuration;
use crate::constant::{
    FRIED_COEFFICIENT, PI, TURBULENCE_PATH_LENGTH, VON_KARMAN_AMPLITUDE, VON_KARMAN_INNER_SCALE,
};
use crate::error::{BeamError, Result};
use crate::field::PhaseScreen;
use crate::fourier::Fourier2D;
use crate::grid::Grid;
use nalgebra::{Complex, DMatrix};
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strength and scales of the turbulence.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TurbulenceParameters {
    /// Refractive-index structure constant, units of m^(-2/3).
    pub cn2: f64,

    /// Inner scale, m.
    pub l_min: f64,

    /// Outer scale, m.
    pub l_max: f64,
}

impl TurbulenceParameters {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        TurbulenceParameters {
            cn2: configuration.cn2,
            l_min: configuration.l_min,
            l_max: configuration.l_max,
        }
    }

    pub fn with_cn2(self, cn2: f64) -> Self {
        TurbulenceParameters { cn2, ..self }
    }

    pub fn with_scales(self, l_min: f64, l_max: f64) -> Self {
        TurbulenceParameters {
            l_min,
            l_max,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        for &(name, value) in &[("cn2", self.cn2), ("l_min", self.l_min), ("l_max", self.l_max)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(BeamError::invalid_parameter(name, value));
            }
        }
        Ok(())
    }
}

/// Fried parameter r0 = (0.423 k^2 Cn2 Z)^(-3/5) over the fixed 100 m path, in m.
pub fn fried_parameter(wavelength: f64, cn2: f64) -> f64 {
    let k = 2.0 * PI / wavelength;
    (FRIED_COEFFICIENT * k.powi(2) * cn2 * TURBULENCE_PATH_LENGTH).powf(-3.0 / 5.0)
}

/// von Karman phase power spectral density sampled on the centred frequency grid.
///
/// ```text
/// PSD(f) = 0.023 r0^(-5/3) exp(-(f/fm)^2) / (f^2 + f0^2)^(11/6)
/// fm = 5.92 / (2 pi l_min),  f0 = 1 / l_max
/// ```
///
/// The zero-frequency (piston) sample is set to exactly zero.
pub fn von_karman_psd(
    grid: &Grid,
    wavelength: f64,
    parameters: &TurbulenceParameters,
) -> Result<DMatrix<f64>> {
    if !(wavelength > 0.0 && wavelength.is_finite()) {
        return Err(BeamError::invalid_parameter("wavelength", wavelength));
    }
    parameters.validate()?;

    let r0 = fried_parameter(wavelength, parameters.cn2);
    let fm = VON_KARMAN_INNER_SCALE / (2.0 * PI * parameters.l_min);
    let f0 = 1.0 / parameters.l_max;
    let (fx, fy) = grid.frequencies();
    let mut psd = fx.zip_map(&fy, |fx, fy| {
        let f_sq = fx * fx + fy * fy;
        VON_KARMAN_AMPLITUDE * r0.powf(-5.0 / 3.0) * (-f_sq / fm.powi(2)).exp()
            / (f_sq + f0 * f0).powf(11.0 / 6.0)
    });
    psd[grid.centre()] = 0.0;
    Ok(psd)
}

/// Synthesises phase screens for one grid, wavelength and turbulence strength.
///
/// The spectral filter and the transforms are prepared once; every call to
/// [PhaseScreenGenerator::generate] is an independent draw.
#[derive(Clone, Debug)]
pub struct PhaseScreenGenerator {
    grid: Grid,
    amplitude: DMatrix<f64>,
    fourier: Fourier2D,
}

impl PhaseScreenGenerator {
    pub fn new(grid: Grid, wavelength: f64, parameters: &TurbulenceParameters) -> Result<Self> {
        let psd = von_karman_psd(&grid, wavelength, parameters)?;
        let (dfx, dfy) = grid.frequency_spacing();
        debug!(
            r0 = fried_parameter(wavelength, parameters.cn2),
            cn2 = parameters.cn2,
            shape = ?grid.shape(),
            "preparing phase screen generator"
        );
        Ok(PhaseScreenGenerator {
            grid,
            amplitude: psd.map(|value| (value * dfx * dfy).sqrt()),
            fourier: Fourier2D::new(grid.shape()),
        })
    }

    /// Generator for a configuration's grid, wavelength and turbulence parameters.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        configuration.validate()?;
        PhaseScreenGenerator::new(
            configuration.grid()?,
            configuration.wavelength,
            &TurbulenceParameters::from_configuration(configuration),
        )
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Draws one phase screen, in radians, using `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> PhaseScreen {
        let spectrum = self.amplitude.map(|amplitude| {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex::new(re, im) * amplitude
        });
        let samples = (self.grid.size_x * self.grid.size_y) as f64;
        self.fourier.inverse(&spectrum).map(|value| value.re * samples)
    }

    /// Draws `count` independent screens in parallel, each from its own thread RNG.
    pub fn generate_many(&self, count: usize) -> Vec<PhaseScreen> {
        (0..count)
            .into_par_iter()
            .map(|_| self.generate(&mut rand::thread_rng()))
            .collect()
    }
}

/// Draws one phase screen with a caller-supplied random number generator.
pub fn generate_phase_screen_with_rng<R: Rng + ?Sized>(
    grid: &Grid,
    wavelength: f64,
    parameters: &TurbulenceParameters,
    rng: &mut R,
) -> Result<PhaseScreen> {
    Ok(PhaseScreenGenerator::new(*grid, wavelength, parameters)?.generate(rng))
}

/// Draws one phase screen from the thread-local random number generator.
///
/// Successive calls are independent realisations.
pub fn generate_phase_screen(
    grid: &Grid,
    wavelength: f64,
    parameters: &TurbulenceParameters,
) -> Result<PhaseScreen> {
    generate_phase_screen_with_rng(grid, wavelength, parameters, &mut rand::thread_rng())
}

/// Draws `count` independent phase screens in parallel.
pub fn generate_phase_screens(
    grid: &Grid,
    wavelength: f64,
    parameters: &TurbulenceParameters,
    count: usize,
) -> Result<Vec<PhaseScreen>> {
    Ok(PhaseScreenGenerator::new(*grid, wavelength, parameters)?.generate_many(count))
}
