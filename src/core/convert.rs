/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Conversion between the row-of-rows form that callers hand us and [`Matrix`].
//!
//! Input can be anything that looks like a slice of rows: `Vec<Vec<f64>>`,
//! `&[&[f64]]`, `[[f64; N]; M]`... Output is always an [`ExternalMatrix`].

use crate::{Matrix, MalformedInputError, Malformation};

/// Owned row-of-rows matrix, as handed back to callers.
pub type ExternalMatrix = Vec<Vec<f64>>;

/// Read a rectangular matrix of finite values.
///
/// The width is taken from row 0; every other row must agree.
pub fn to_matrix<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix, MalformedInputError>
{ to_matrix_impl(rows, false) }

/// Like [`to_matrix`], but NaN and infinities are let through.
pub fn to_matrix_allow_non_finite<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix, MalformedInputError>
{ to_matrix_impl(rows, true) }

pub(crate) fn to_matrix_impl<R: AsRef<[f64]>>(
    rows: &[R],
    allow_non_finite: bool,
) -> Result<Matrix, MalformedInputError> {
    let malformed = |problem| Err(MalformedInputError::new(problem));

    let width = match rows.first() {
        None => return malformed(Malformation::NoRows),
        Some(row) => row.as_ref().len(),
    };

    let mut data = Vec::with_capacity(rows.len() * width);
    for (r, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != width {
            return malformed(Malformation::Ragged { row: r, expected: width, found: row.len() });
        }
        if !allow_non_finite {
            if let Some(c) = row.iter().position(|x| !x.is_finite()) {
                return malformed(Malformation::NonFinite { row: r, col: c, value: row[c] });
            }
        }
        data.extend_from_slice(row);
    }
    Ok(Matrix::from_row_major_data((rows.len(), width), data))
}

/// Copy a matrix back out into rows. Values are copied exactly.
pub fn to_external(matrix: &Matrix) -> ExternalMatrix
{ matrix.rows().map(|row| row.to_vec()).collect() }
