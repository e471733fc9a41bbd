/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrix inversion with an explicit singularity check.
//!
//! The factorization itself is `nalgebra`'s partial-pivoting LU. We only look at
//! the pivots it produced before asking it for an inverse, because a plain inverse
//! of a numerically singular matrix comes back full of huge values or infinities
//! rather than failing.

use crate::{Matrix, SingularMatrixError};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Default for the pivot-ratio tolerance of an `n × n` matrix.
pub fn default_rtol(n: usize) -> f64 { n as f64 * f64::EPSILON }

/// Compute the inverse of a square matrix.
///
/// The matrix is rejected as singular when an LU pivot is exactly zero, or when the
/// smallest absolute pivot is no more than `rtol` times the largest
/// (`rtol` defaults to [`default_rtol`]).
///
/// The ratio does not change when the whole matrix is scaled, but it does when
/// rows or columns are scaled independently. A badly scaled diagonal such as
/// `diag(1e10, 1e-10)` is therefore rejected, even though its exact inverse is
/// representable.
///
/// # Panics
///
/// Panics if the matrix is not square.
pub fn checked_inverse(square: &Matrix, rtol: Option<f64>) -> Result<Matrix, SingularMatrixError> {
    assert!(square.is_square(), "inverse of non-square {:?} matrix", square.dims());

    let n = square.num_rows();
    if n == 0 {
        return Ok(Matrix::eye(0)); // trivial
    }
    let tolerance = rtol.unwrap_or_else(|| default_rtol(n));

    let lu = DMatrix::from_row_slice(n, n, square.c_order_data()).lu();

    let pivots = lu.u().diagonal().map(f64::abs);
    let (min, max) = (pivots.min(), pivots.max());
    let pivot_ratio = match max {
        // NaN input cannot get past the finiteness check in `to_matrix` unless the caller
        // opted in; treat it as singular either way.
        max if !(max > 0.0) => 0.0,
        max => min / max,
    };
    let singular = SingularMatrixError { order: n, pivot_ratio, tolerance };

    if min == 0.0 || !(pivot_ratio > tolerance) {
        debug!("rejecting {}x{} divisor: pivots {:?}", n, n, pivots.as_slice());
        return Err(singular);
    }

    let inverse = match lu.try_inverse() {
        Some(inverse) => inverse,
        None => return Err(singular),
    };
    if inverse.iter().any(|x| !x.is_finite()) {
        debug!("inverse of {}x{} divisor is not finite", n, n);
        return Err(singular);
    }

    Ok(Array2::from_shape_fn((n, n), |(r, c)| inverse[(r, c)]).into())
}
