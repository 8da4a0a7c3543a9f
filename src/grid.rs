//! The sampled transverse plane shared by every beam, propagator and phase screen.

extern crate nalgebra;
use crate::error::{BeamError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Returns `n` samples spaced by `spacing`, with the zero sample at index `n / 2`.
///
/// This is the single centring convention of the crate. Spatial coordinates and
/// spatial frequencies are both built from it, so the origin of a beam and the
/// zero-frequency bin of its spectrum always sit on the same array index.
/// For odd `n` the axis is symmetric; for even `n` it runs from `-n/2` to `n/2 - 1`.
pub fn centred_axis(n: usize, spacing: f64) -> Vec<f64> {
    let half = (n / 2) as f64;
    (0..n).map(|i| (i as f64 - half) * spacing).collect()
}

/// A rectangular grid of `size_y` rows by `size_x` columns with square pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    /// Number of samples along x (columns).
    pub size_x: usize,

    /// Number of samples along y (rows).
    pub size_y: usize,

    /// Sample pitch, SI units of m.
    pub pixel_size: f64,
}

impl Grid {
    pub fn new(size_x: usize, size_y: usize, pixel_size: f64) -> Result<Self> {
        if size_x == 0 || size_y == 0 {
            return Err(BeamError::InvalidParameters(format!(
                "grid size must be positive, got {}x{}",
                size_x, size_y
            )));
        }
        if !(pixel_size > 0.0 && pixel_size.is_finite()) {
            return Err(BeamError::invalid_parameter("pixel_size", pixel_size));
        }
        Ok(Grid {
            size_x,
            size_y,
            pixel_size,
        })
    }

    /// The grid that matches the shape of an existing array, as `(rows, columns)`.
    pub fn for_shape(shape: (usize, usize), pixel_size: f64) -> Result<Self> {
        Grid::new(shape.1, shape.0, pixel_size)
    }

    /// Shape of arrays sampled on this grid, `(rows, columns)` = `(size_y, size_x)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.size_y, self.size_x)
    }

    /// Index `(row, column)` of the sample at the origin.
    pub fn centre(&self) -> (usize, usize) {
        (self.size_y / 2, self.size_x / 2)
    }

    pub fn x_axis(&self) -> Vec<f64> {
        centred_axis(self.size_x, self.pixel_size)
    }

    pub fn y_axis(&self) -> Vec<f64> {
        centred_axis(self.size_y, self.pixel_size)
    }

    /// Cartesian coordinates `(X, Y)` of every sample.
    ///
    /// `X` varies along columns and `Y` along rows, both zero at [Grid::centre].
    pub fn coordinates(&self) -> (DMatrix<f64>, DMatrix<f64>) {
        meshgrid(&self.x_axis(), &self.y_axis())
    }

    /// Spacing of the spatial-frequency grid, `(dfx, dfy)` in units of 1/m.
    pub fn frequency_spacing(&self) -> (f64, f64) {
        (
            1.0 / (self.size_x as f64 * self.pixel_size),
            1.0 / (self.size_y as f64 * self.pixel_size),
        )
    }

    /// Centred spatial frequencies `(FX, FY)` matching the layout of [crate::fourier::forward].
    pub fn frequencies(&self) -> (DMatrix<f64>, DMatrix<f64>) {
        let (dfx, dfy) = self.frequency_spacing();
        meshgrid(
            &centred_axis(self.size_x, dfx),
            &centred_axis(self.size_y, dfy),
        )
    }
}

fn meshgrid(x: &[f64], y: &[f64]) -> (DMatrix<f64>, DMatrix<f64>) {
    let xx = DMatrix::from_fn(y.len(), x.len(), |_, j| x[j]);
    let yy = DMatrix::from_fn(y.len(), x.len(), |i, _| y[i]);
    (xx, yy)
}
