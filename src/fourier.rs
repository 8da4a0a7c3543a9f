//! Centred two-dimensional Fourier transforms.
//!
//! Both directions keep the zero-frequency (or zero-position) sample at index
//! `(rows / 2, columns / 2)` on input and on output:
//!
//! ```text
//! forward(x) = fftshift(fft2(ifftshift(x)))
//! inverse(x) = fftshift(ifft2(ifftshift(x)))
//! ```
//!
//! The forward transform is unnormalised and the inverse carries the `1 / (rows * columns)`
//! factor, so `inverse(forward(x)) == x` up to rounding. Every propagator and phase
//! screen goes through this module; nothing else in the crate shifts spectra.

extern crate nalgebra;
use nalgebra::{Complex, DMatrix, Scalar};
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Row and column transforms planned once for a fixed array shape.
///
/// Planning is the expensive part of an FFT, so consumers that transform many
/// arrays of the same shape (propagators, batches of phase screens) hold one of these.
#[derive(Clone)]
pub struct Fourier2D {
    rows: usize,
    columns: usize,
    column_forward: Arc<dyn Fft<f64>>,
    column_inverse: Arc<dyn Fft<f64>>,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for Fourier2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fourier2D")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish()
    }
}

impl Fourier2D {
    /// Plans transforms for arrays of shape `(rows, columns)`.
    pub fn new(shape: (usize, usize)) -> Self {
        let (rows, columns) = shape;
        let mut planner = FftPlanner::new();
        Fourier2D {
            rows,
            columns,
            column_forward: planner.plan_fft_forward(rows),
            column_inverse: planner.plan_fft_inverse(rows),
            row_forward: planner.plan_fft_forward(columns),
            row_inverse: planner.plan_fft_inverse(columns),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Centred forward transform.
    ///
    /// # Panics
    ///
    /// Panics if `field` does not have the planned shape. Use [Fourier2D::shape] to
    /// check first, or the free function [forward], which plans for any shape.
    pub fn forward(&self, field: &DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
        self.check_shape(field);
        let mut buffer = ifftshift(field);
        self.transform(&mut buffer, &self.column_forward, &self.row_forward);
        fftshift(&buffer)
    }

    /// Centred inverse transform, normalised by the number of samples.
    ///
    /// # Panics
    ///
    /// Panics if `spectrum` does not have the planned shape.
    pub fn inverse(&self, spectrum: &DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
        self.check_shape(spectrum);
        let mut buffer = ifftshift(spectrum);
        self.transform(&mut buffer, &self.column_inverse, &self.row_inverse);
        let scale = 1.0 / (self.rows * self.columns) as f64;
        buffer.iter_mut().for_each(|value| *value *= scale);
        fftshift(&buffer)
    }

    fn check_shape(&self, array: &DMatrix<Complex<f64>>) {
        assert_eq!(
            array.shape(),
            (self.rows, self.columns),
            "array shape does not match the planned transform"
        );
    }

    /// Applies the 1D transforms along both axes in place.
    fn transform(
        &self,
        buffer: &mut DMatrix<Complex<f64>>,
        columns: &Arc<dyn Fft<f64>>,
        rows: &Arc<dyn Fft<f64>>,
    ) {
        // storage is column-major, so every column is a contiguous chunk
        columns.process(buffer.as_mut_slice());
        let mut transposed = buffer.transpose();
        rows.process(transposed.as_mut_slice());
        transposed.transpose_to(buffer);
    }
}

/// Centred forward transform of `field`, planning the FFT on demand.
pub fn forward(field: &DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
    Fourier2D::new(field.shape()).forward(field)
}

/// Centred inverse transform of `spectrum`, planning the FFT on demand.
pub fn inverse(spectrum: &DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
    Fourier2D::new(spectrum.shape()).inverse(spectrum)
}

/// Moves the zero-frequency sample from index 0 to the array centre.
pub fn fftshift<T: Scalar>(array: &DMatrix<T>) -> DMatrix<T> {
    let (rows, columns) = array.shape();
    roll(array, rows / 2, columns / 2)
}

/// Inverse of [fftshift]; identical for even sizes.
pub fn ifftshift<T: Scalar>(array: &DMatrix<T>) -> DMatrix<T> {
    let (rows, columns) = array.shape();
    roll(array, rows - rows / 2, columns - columns / 2)
}

/// Circularly shifts `array` so that element `(i, j)` lands at `(i + di, j + dj)`.
fn roll<T: Scalar>(array: &DMatrix<T>, di: usize, dj: usize) -> DMatrix<T> {
    let (rows, columns) = array.shape();
    DMatrix::from_fn(rows, columns, |i, j| {
        array[((i + rows - di) % rows, (j + columns - dj) % columns)].clone()
    })
}
