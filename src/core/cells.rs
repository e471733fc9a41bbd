/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Text-cell helpers for grid-style front ends.

use crate::convert::ExternalMatrix;
use crate::{MalformedInputError, Malformation};

/// Parse a grid of text cells. A blank cell counts as zero.
///
/// The grid is not checked for raggedness here; that happens when the result is
/// converted to a [`Matrix`](crate::Matrix).
pub fn parse_cells<R, S>(cells: &[R]) -> Result<ExternalMatrix, MalformedInputError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    cells.iter().enumerate().map(|(row, cells)| {
        cells.as_ref().iter().enumerate().map(|(col, cell)| {
            let text = cell.as_ref().trim();
            match text {
                "" => Ok(0.0),
                _ => text.parse::<f64>().map_err(|_| MalformedInputError::new(
                    Malformation::Unparseable { row, col, text: text.to_string() },
                )),
            }
        }).collect::<Result<Vec<f64>, _>>()
    }).collect()
}

/// Whole numbers print without a fraction, everything else with two decimals.
///
/// Non-finite values print as `Infinity`, `-Infinity` and `NaN`, as a JVM front end
/// would show them.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        match x > 0.0 {
            true => "Infinity".to_string(),
            false => "-Infinity".to_string(),
        }
    } else if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        format!("{}", x as i64)
    } else {
        format!("{:.2}", x)
    }
}

pub fn format_matrix<R: AsRef<[f64]>>(rows: &[R]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.as_ref().iter().cloned().map(format_number).collect())
        .collect()
}
