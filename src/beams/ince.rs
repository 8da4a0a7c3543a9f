//! Ince-Gaussian modes IG_{p,m}.
//!
//! Ince-Gaussian beams are the eigenmodes of the paraxial wave equation in elliptic
//! coordinates. Their transverse profile is a product of two Ince polynomials, one
//! in the angular coordinate `eta` and one in the radial coordinate `xi` (entering
//! as an imaginary argument), times a Gaussian envelope.
//!
//! The Ince polynomial of even order `p` is a finite cosine series
//! `C(eta) = sum_r A_r cos(2 r eta)`, `r = 0..p/2`. The coefficients `A_r` are the
//! eigenvector of a tridiagonal recurrence matrix, picked by mode index `m` after
//! sorting the eigenvalues in ascending order.
//!
//! Only even parity and even order are implemented. Odd requests return
//! [BeamError::NotSupported].

use super::{GaussianOptics, Parity};
use crate::configuration::Configuration;
use crate::constant::{INCE_SEMI_MAJOR, INCE_SEMI_MINOR, PI};
use crate::error::{BeamError, Result};
use crate::field::Field;
use crate::maths;
use nalgebra::{Complex, DMatrix, DVector};
use tracing::{debug, trace};

/// Focal geometry of the elliptic coordinate system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipticGeometry {
    /// Semi-focal distance f0 at the waist, in m.
    pub focal_distance: f64,

    /// Semi-major axis of the reference ellipse, in m.
    pub semi_major: f64,

    /// Semi-minor axis of the reference ellipse, in m.
    pub semi_minor: f64,
}

impl EllipticGeometry {
    /// Geometry for a waist `w0` and an optional ellipticity `q = 2 f0^2 / w0^2`.
    ///
    /// Without an ellipticity, the focal distance follows from the default semi-axes,
    /// `f0 = sqrt(a^2 - b^2)`. With one, `f0 = sqrt(q w0^2 / 2)` and the minor axis
    /// is kept at its default.
    pub fn new(w0: f64, elliptic_parameter: Option<f64>) -> Result<Self> {
        match elliptic_parameter {
            None => Ok(EllipticGeometry {
                focal_distance: (INCE_SEMI_MAJOR.powi(2) - INCE_SEMI_MINOR.powi(2)).sqrt(),
                semi_major: INCE_SEMI_MAJOR,
                semi_minor: INCE_SEMI_MINOR,
            }),
            Some(q) => {
                if !(q > 0.0 && q.is_finite()) {
                    return Err(BeamError::invalid_parameter("elliptic_parameter", q));
                }
                let focal_distance = (q * w0.powi(2) / 2.0).sqrt();
                Ok(EllipticGeometry {
                    focal_distance,
                    semi_major: (focal_distance.powi(2) + INCE_SEMI_MINOR.powi(2)).sqrt(),
                    semi_minor: INCE_SEMI_MINOR,
                })
            }
        }
    }

    /// Ellipticity `q = 2 f0^2 / w0^2`.
    pub fn ellipticity(&self, w0: f64) -> f64 {
        2.0 * self.focal_distance.powi(2) / w0.powi(2)
    }
}

/// Rejects mode indices outside the implemented domain.
///
/// `p` and `m` must share parity and `1 <= m <= p`; these are
/// [BeamError::InvalidModeIndex]. Odd parity and odd `p` are valid Ince-Gaussian
/// modes that are not implemented, and are [BeamError::NotSupported].
pub fn validate_indices(p: u32, m: u32, parity: Parity) -> Result<()> {
    if (p + m) % 2 != 0 {
        return Err(BeamError::InvalidModeIndex(format!(
            "p = {} and m = {} do not have the same parity",
            p, m
        )));
    }
    if m < 1 || m > p {
        return Err(BeamError::InvalidModeIndex(format!(
            "m = {} must lie in [1, {}]",
            m, p
        )));
    }
    if parity == Parity::Odd {
        return Err(BeamError::NotSupported(
            "odd Ince-Gaussian beams are not implemented".to_string(),
        ));
    }
    if p % 2 != 0 {
        return Err(BeamError::NotSupported(format!(
            "even Ince-Gaussian beams of odd order p = {} are not implemented",
            p
        )));
    }
    Ok(())
}

/// Tridiagonal recurrence matrix of the even Ince polynomials of even order `p`.
///
/// With `j = p/2` and `N = j + 1`:
///
/// ```text
/// M[i][i]     = 4 i^2                  i = 0..N-1
/// M[i][i+1]   = q (j + i + 1)          i = 0..N-2
/// M[1][0]     = 2 q j
/// M[i+1][i]   = q (j - i)              i = 1..N-2
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RecurrenceMatrix {
    pub diagonal: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl RecurrenceMatrix {
    pub fn new(p: u32, q: f64) -> Self {
        let j = (p / 2) as usize;
        let size = j + 1;
        let diagonal = (0..size).map(|i| 4.0 * (i * i) as f64).collect();
        let upper = (0..size - 1).map(|i| q * (j + i + 1) as f64).collect();
        let lower = (0..size - 1)
            .map(|i| {
                if i == 0 {
                    2.0 * q * j as f64
                } else {
                    q * (j - i) as f64
                }
            })
            .collect();
        RecurrenceMatrix {
            diagonal,
            upper,
            lower,
        }
    }

    pub fn size(&self) -> usize {
        self.diagonal.len()
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.size();
        let mut matrix = DMatrix::from_diagonal(&DVector::from_column_slice(&self.diagonal));
        for k in 0..n - 1 {
            matrix[(k, k + 1)] = self.upper[k];
            matrix[(k + 1, k)] = self.lower[k];
        }
        matrix
    }
}

/// Normalised cosine-series coefficients of one even Ince polynomial.
#[derive(Clone, Debug)]
pub struct InceCoefficients {
    /// `A_r`, `r = 0..p/2`.
    pub coefficients: DVector<f64>,

    /// Eigenvalue of the recurrence matrix belonging to this mode.
    pub eigenvalue: f64,
}

impl InceCoefficients {
    /// Coefficients of the even Ince polynomial `C_p^m` with ellipticity `q`.
    ///
    /// The eigenvector is scaled so that
    /// `2 A_0^2 (p/2)!^2 + sum_{r>=1} ((p/2 + r)! (p/2 - r)!) A_r^2 = 1`,
    /// and its sign is chosen to make `sum_r A_r` positive.
    pub fn new(p: u32, m: u32, q: f64) -> Result<Self> {
        validate_indices(p, m, Parity::Even)?;
        let matrix = RecurrenceMatrix::new(p, q);
        let (eigenvalues, eigenvectors) =
            maths::tridiagonal_eigen(&matrix.diagonal, &matrix.upper, &matrix.lower)?;
        trace!(?eigenvalues, "Ince recurrence eigenvalues");

        // ascending eigenvalue order, mode m is column m/2
        let index = (m / 2) as usize;
        let vector = eigenvectors.column(index).into_owned();

        let j = p / 2;
        let weight_sum = 2.0 * (vector[0] * maths::factorial(j)).powi(2)
            + (1..matrix.size())
                .map(|r| {
                    let r = r as u32;
                    maths::factorial(j + r) * maths::factorial(j - r) * vector[r as usize].powi(2)
                })
                .sum::<f64>();
        let norm = weight_sum.sqrt();
        let sign = vector.sum().signum();
        if !(norm > 0.0 && norm.is_finite()) || vector.sum() == 0.0 {
            return Err(BeamError::NumericalFailure(format!(
                "Ince coefficients for p = {}, m = {}, q = {} cannot be normalised",
                p, m, q
            )));
        }

        Ok(InceCoefficients {
            coefficients: vector * (sign / norm),
            eigenvalue: eigenvalues[index],
        })
    }

    /// `C(eta) = sum_r A_r cos(2 r eta)`.
    pub fn evaluate(&self, eta: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(r, a)| a * (2.0 * r as f64 * eta).cos())
            .sum()
    }

    /// `C(i xi) = sum_r A_r cosh(2 r xi)`, the polynomial at an imaginary argument.
    pub fn evaluate_imaginary(&self, xi: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(r, a)| a * (2.0 * r as f64 * xi).cosh())
            .sum()
    }
}

/// Elliptic coordinates `(eta, xi)` of every sample of `(x, y)`.
///
/// `focal_sq` is the squared semi-focal distance of the coordinate system. `eta`
/// runs over `[0, 2 pi)`; its quadrant is fixed by the signs of `x` and `y`:
///
/// ```text
/// x >= 0, y >= 0  ->  eta0
/// x <  0, y >= 0  ->  pi - eta0
/// x <= 0, y <  0  ->  pi + eta0
/// x >  0, y <  0  ->  2 pi - eta0
/// ```
pub fn elliptic_coordinates(
    x: &DMatrix<f64>,
    y: &DMatrix<f64>,
    focal_sq: f64,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let c = 2.0 * focal_sq;
    let b = x.zip_map(y, |x, y| x * x + y * y - focal_sq);
    let delta = b.zip_map(y, |b, y| (b * b + 2.0 * c * y * y).sqrt());

    let eta0 = b.zip_map(&delta, |b, delta| {
        ((-b + delta) / c).max(0.0).min(1.0).sqrt().asin()
    });
    let xi = b.zip_map(&delta, |b, delta| {
        let s = ((-b - delta) / c).min(0.0);
        (1.0 - 2.0 * s + 2.0 * (s * s - s).sqrt()).ln() / 2.0
    });

    let mask = |condition: fn(f64, f64) -> bool| {
        x.zip_map(y, |x, y| if condition(x, y) { 1.0 } else { 0.0 })
    };
    let first = mask(|x, y| x >= 0.0 && y >= 0.0);
    let second = mask(|x, y| x < 0.0 && y >= 0.0);
    let third = mask(|x, y| x <= 0.0 && y < 0.0);
    let fourth = mask(|x, y| x > 0.0 && y < 0.0);

    let eta = first.component_mul(&eta0)
        + second.component_mul(&eta0.map(|e| PI - e))
        + third.component_mul(&eta0.map(|e| PI + e))
        + fourth.component_mul(&eta0.map(|e| 2.0 * PI - e));
    (eta, xi)
}

/// Complex field of the even Ince-Gaussian mode IG_{p,m} at longitudinal position `z`.
///
/// # Arguments
///
/// `p`: order of the Ince polynomials; must be even.
///
/// `m`: mode index, same parity as `p`, `1 <= m <= p`.
///
/// `parity`: only [Parity::Even] is implemented.
///
/// `elliptic_parameter`: optional ellipticity `q = 2 f0^2 / w0^2`; see [EllipticGeometry::new].
///
/// `z`: distance from the waist in m. `z = 0` is allowed.
pub fn ince_gaussian(
    p: u32,
    m: u32,
    parity: Parity,
    elliptic_parameter: Option<f64>,
    configuration: &Configuration,
    z: f64,
) -> Result<Field> {
    validate_indices(p, m, parity)?;
    let optics = GaussianOptics::new(configuration, z)?;
    let w0 = configuration.w0;
    let w = optics.spot_size();
    let k = optics.wavenumber;
    let z0 = optics.rayleigh_range;

    let geometry = EllipticGeometry::new(w0, elliptic_parameter)?;
    let q = geometry.ellipticity(w0);
    let ince = InceCoefficients::new(p, m, q)?;

    let at_zero = ince.evaluate(0.0);
    let at_right_angle = ince.evaluate(PI / 2.0);
    let sign = if (m / 2) % 2 == 0 { 1.0 } else { -1.0 };
    let normalisation = sign
        * 2.0_f64.sqrt()
        * maths::factorial(p / 2)
        * ince.coefficients[0]
        * (2.0 / PI).sqrt()
        / w0
        / at_zero
        / at_right_angle;
    if !normalisation.is_finite() {
        return Err(BeamError::NumericalFailure(format!(
            "Ince-Gaussian p = {}, m = {} has a vanishing polynomial at eta = 0 or pi/2",
            p, m
        )));
    }

    debug!(
        p,
        m,
        q,
        eigenvalue = ince.eigenvalue,
        "generating Ince-Gaussian beam"
    );

    let (x, y) = configuration.grid()?.coordinates();
    let focal_sq = geometry.focal_distance.powi(2) * (w0 / w).powi(2);
    let (eta, xi) = elliptic_coordinates(&x, &y, focal_sq);

    let longitudinal = Complex::from_polar(1.0, k * z - (p + 1) as f64 * (z / z0).atan());
    let mut field = DMatrix::from_element(x.nrows(), x.ncols(), Complex::new(0.0, 0.0));
    for (index, value) in field.iter_mut().enumerate() {
        let r_sq = x[index] * x[index] + y[index] * y[index];
        let amplitude = normalisation
            * ince.evaluate(eta[index])
            * ince.evaluate_imaginary(xi[index])
            * (-r_sq / w0.powi(2)).exp()
            * w0
            / w;
        let curvature_phase = k * z * r_sq / (2.0 * (z * z + z0 * z0));
        *value = longitudinal * Complex::from_polar(amplitude, curvature_phase);
    }
    Ok(field)
}
