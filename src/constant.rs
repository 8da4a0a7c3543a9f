/// Mathematical constant exp(1)
pub const EXP: f64 = std::f64::consts::E;

/// Mathematical constant pi
pub const PI: f64 = std::f64::consts::PI;

/// Path length used to convert Cn2 into a Fried parameter, in units of m.
pub const TURBULENCE_PATH_LENGTH: f64 = 100.0;

/// Coefficient of the plane-wave Fried parameter, r0 = (0.423 k^2 Cn2 Z)^(-3/5).
pub const FRIED_COEFFICIENT: f64 = 0.423;

/// Amplitude of the von Karman phase power spectral density.
pub const VON_KARMAN_AMPLITUDE: f64 = 0.023;

/// Inner-scale cutoff coefficient, fm = 5.92 / (2 pi l_min).
pub const VON_KARMAN_INNER_SCALE: f64 = 5.92;

/// Default major semi-axis used to derive the Ince-Gaussian focal distance, m.
pub const INCE_SEMI_MAJOR: f64 = 0.3100000175;

/// Default minor semi-axis used to derive the Ince-Gaussian focal distance, m.
pub const INCE_SEMI_MINOR: f64 = 0.3;
