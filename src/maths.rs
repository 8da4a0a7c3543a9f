//! Mathematical utilities

extern crate nalgebra;
use crate::error::{BeamError, Result};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Factorial `n!` as a float.
///
/// Mode orders are small, so the product is exact up to `n = 22` and accurate to
/// rounding beyond that.
pub fn factorial(n: u32) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Physicists' Hermite polynomial `H_n(x)`, evaluated by the three-term recurrence
/// `H_{k+1} = 2x H_k - 2k H_{k-1}`.
pub fn hermite(n: u32, x: f64) -> f64 {
    let mut previous = 1.0;
    if n == 0 {
        return previous;
    }
    let mut current = 2.0 * x;
    for k in 1..n {
        let next = 2.0 * x * current - 2.0 * k as f64 * previous;
        previous = current;
        current = next;
    }
    current
}

/// Generalised Laguerre polynomial `L_n^alpha(x)`.
pub fn generalised_laguerre(n: u32, alpha: f64, x: f64) -> f64 {
    let mut previous = 1.0;
    if n == 0 {
        return previous;
    }
    let mut current = 1.0 + alpha - x;
    for k in 1..n {
        let k = k as f64;
        let next = ((2.0 * k + 1.0 + alpha - x) * current - (k + alpha) * previous) / (k + 1.0);
        previous = current;
        current = next;
    }
    current
}

/// Eigen-decomposition of a real tridiagonal matrix whose off-diagonal products are positive.
///
/// Such a matrix is similar to a symmetric one through a diagonal scaling `D`,
/// `S = D M D^-1`, so it has real eigenvalues and can be solved with a symmetric
/// eigen-solver. Eigenvectors are mapped back with `v = D^-1 u`.
///
/// # Arguments
///
/// `diagonal`: the `n` diagonal entries.
///
/// `upper`: the `n-1` entries `M[i][i+1]`.
///
/// `lower`: the `n-1` entries `M[i+1][i]`.
///
/// Returns eigenvalues in ascending order and the matching eigenvectors as columns.
/// Equal eigenvalues keep the order returned by the solver.
pub fn tridiagonal_eigen(
    diagonal: &[f64],
    upper: &[f64],
    lower: &[f64],
) -> Result<(DVector<f64>, DMatrix<f64>)> {
    let n = diagonal.len();
    if n == 0 || upper.len() + 1 != n || lower.len() + 1 != n {
        return Err(BeamError::InvalidParameters(format!(
            "tridiagonal matrix of order {} needs {} off-diagonal entries, got {} and {}",
            n,
            n.saturating_sub(1),
            upper.len(),
            lower.len()
        )));
    }
    if upper.iter().zip(lower).any(|(u, l)| !(u * l > 0.0)) {
        return Err(BeamError::NumericalFailure(
            "off-diagonal products must be positive to symmetrise the matrix".to_string(),
        ));
    }

    let mut scaling = vec![1.0; n];
    for k in 0..n - 1 {
        scaling[k + 1] = scaling[k] * (upper[k] / lower[k]).sqrt();
    }

    let mut symmetric = DMatrix::from_diagonal(&DVector::from_column_slice(diagonal));
    for k in 0..n - 1 {
        let coupling = (upper[k] * lower[k]).sqrt();
        symmetric[(k, k + 1)] = coupling;
        symmetric[(k + 1, k)] = coupling;
    }

    let eigen = SymmetricEigen::try_new(symmetric, f64::EPSILON, 0).ok_or_else(|| {
        BeamError::NumericalFailure("symmetric eigen-decomposition did not converge".to_string())
    })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values = DVector::from_fn(n, |i, _| eigen.eigenvalues[order[i]]);
    let vectors = DMatrix::from_fn(n, n, |row, column| {
        eigen.eigenvectors[(row, order[column])] / scaling[row]
    });
    Ok((values, vectors))
}
