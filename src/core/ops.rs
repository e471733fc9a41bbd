/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The four binary operations, on already-converted matrices.

use crate::error::Requirement;
use crate::inverse::checked_inverse;
use crate::{DimensionMismatchError, Error, Matrix};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    /// Right-multiplication by the inverse of the second operand.
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Stable numeric code, for callers across a C boundary.
    pub fn code(self) -> i32 {
        match self {
            Operation::Add => 0,
            Operation::Subtract => 1,
            Operation::Multiply => 2,
            Operation::Divide => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Operation::ALL.iter().cloned().find(|op| op.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    /// Check the operands' shapes against this operation, without computing anything.
    pub fn check_dims(self, a: &Matrix, b: &Matrix) -> Result<(), DimensionMismatchError> {
        let requirement = match self {
            Operation::Add |
            Operation::Subtract => match a.dims() == b.dims() {
                true => return Ok(()),
                false => Requirement::SameShape,
            },
            Operation::Multiply => match a.num_cols() == b.num_rows() {
                true => return Ok(()),
                false => Requirement::Conformable,
            },
            Operation::Divide => match (b.is_square(), a.num_cols() == b.num_rows()) {
                (true, true) => return Ok(()),
                (false, _) => Requirement::SquareDivisor,
                (true, false) => Requirement::Conformable,
            },
        };
        Err(DimensionMismatchError { op: self, requirement, lhs: a.dims(), rhs: b.dims() })
    }

    /// Apply the operation with default settings.
    pub fn apply(self, a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        self.apply_with_rtol(a, b, None)
    }

    /// `singular_rtol` only matters for [`Operation::Divide`]; see [`checked_inverse`].
    pub fn apply_with_rtol(self, a: &Matrix, b: &Matrix, singular_rtol: Option<f64>) -> Result<Matrix, Error> {
        match self {
            Operation::Add => add(a, b).map_err(Into::into),
            Operation::Subtract => subtract(a, b).map_err(Into::into),
            Operation::Multiply => multiply(a, b).map_err(Into::into),
            Operation::Divide => divide(a, b, singular_rtol),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown operation: {0:?}")]
pub struct ParseOperationError(pub String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operation::ALL.iter().cloned()
            .find(|op| s.eq_ignore_ascii_case(op.name()) || s == op.symbol())
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}

//------------------------------------------------------------------------------

/// Elementwise `a + b`.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, DimensionMismatchError> {
    Operation::Add.check_dims(a, b)?;
    Ok((&a.view() + &b.view()).into())
}

/// Elementwise `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, DimensionMismatchError> {
    Operation::Subtract.check_dims(a, b)?;
    Ok((&a.view() - &b.view()).into())
}

/// Matrix product `a b`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, DimensionMismatchError> {
    Operation::Multiply.check_dims(a, b)?;
    Ok(a.view().dot(&b.view()).into())
}

/// `a b⁻¹`.
///
/// Shapes are checked before any attempt at inversion, so a non-square `b` is always
/// reported as a [`DimensionMismatchError`] and never as singular.
pub fn divide(a: &Matrix, b: &Matrix, singular_rtol: Option<f64>) -> Result<Matrix, Error> {
    Operation::Divide.check_dims(a, b)?;
    let b_inv = checked_inverse(b, singular_rtol)?;
    Ok(a.view().dot(&b_inv.view()).into())
}
