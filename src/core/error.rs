/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::ops::Operation;
use std::fmt;

/// Which argument of a binary operation an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operand { Lhs, Rhs }

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Lhs => write!(f, "first matrix"),
            Operand::Rhs => write!(f, "second matrix"),
        }
    }
}

/// Everything that can go wrong in a call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(#[from] DimensionMismatchError),

    #[error("singular matrix: {0}")]
    SingularMatrix(#[from] SingularMatrixError),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Fieldless mirror of [`Error`], for code that only needs to branch on the kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    DimensionMismatch,
    SingularMatrix,
    InvalidSettings,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedInput(_) => ErrorKind::MalformedInput,
            Error::DimensionMismatch(_) => ErrorKind::DimensionMismatch,
            Error::SingularMatrix(_) => ErrorKind::SingularMatrix,
            Error::InvalidSettings(_) => ErrorKind::InvalidSettings,
        }
    }
}

//------------------------------------------------------------------------------

/// An external matrix could not be read as a rectangular matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedInputError {
    /// `None` when raised by a bare conversion, outside of any operation.
    pub operand: Option<Operand>,
    pub problem: Malformation,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Malformation {
    #[error("matrix has no rows")]
    NoRows,

    #[error("row {row} has length {found}, but row 0 has length {expected}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("element ({row}, {col}) is not finite: {value}")]
    NonFinite { row: usize, col: usize, value: f64 },

    #[error("cell ({row}, {col}) is not a number: {text:?}")]
    Unparseable { row: usize, col: usize, text: String },
}

impl MalformedInputError {
    pub(crate) fn new(problem: Malformation) -> Self
    { MalformedInputError { operand: None, problem } }

    /// Tag the error with the argument it came from.
    pub fn for_operand(self, operand: Operand) -> Self
    { MalformedInputError { operand: Some(operand), ..self } }
}

impl fmt::Display for MalformedInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(operand) = self.operand {
            write!(f, "{}: ", operand)?;
        }
        write!(f, "{}", self.problem)
    }
}

impl std::error::Error for MalformedInputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { Some(&self.problem) }
}

//------------------------------------------------------------------------------

/// Which shape rule an operation imposes on its operands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// `lhs.dims() == rhs.dims()`
    SameShape,
    /// `lhs.num_cols() == rhs.num_rows()`
    Conformable,
    /// `rhs.is_square()`
    SquareDivisor,
}

/// Operand shapes are incompatible with the requested operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionMismatchError {
    pub op: Operation,
    pub requirement: Requirement,
    /// `(rows, cols)`
    pub lhs: (usize, usize),
    /// `(rows, cols)`
    pub rhs: (usize, usize),
}

impl DimensionMismatchError {
    /// The phrasing used by the calculator app when it reports the problem to a user.
    pub fn summary(&self) -> &'static str {
        match (self.requirement, self.op) {
            (Requirement::SameShape, Operation::Subtract) => "Matrices must have the same dimensions for subtraction",
            (Requirement::SameShape, _) => "Matrices must have the same dimensions for addition",
            (Requirement::Conformable, _) => "Number of columns in first matrix must equal number of rows in second matrix",
            (Requirement::SquareDivisor, _) => "Second matrix must be square for division",
        }
    }
}

impl fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ((m, n), (p, q)) = (self.lhs, self.rhs);
        write!(f, "{} ({}: ", self.summary(), self.op)?;
        match self.requirement {
            Requirement::SameShape => write!(f, "expected {}x{}, found {}x{}", m, n, p, q)?,
            Requirement::Conformable => write!(f, "expected {} rows in second matrix, found {}", n, p)?,
            Requirement::SquareDivisor => write!(f, "expected a square matrix, found {}x{}", p, q)?,
        }
        write!(f, ")")
    }
}

impl std::error::Error for DimensionMismatchError {}

//------------------------------------------------------------------------------

/// The divisor of a division has no usable inverse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Second matrix is singular or nearly singular (order {order}, pivot ratio {pivot_ratio:e}, tolerance {tolerance:e})")]
pub struct SingularMatrixError {
    pub order: usize,
    /// Smallest over largest absolute pivot of the LU factorization.
    pub pivot_ratio: f64,
    pub tolerance: f64,
}

//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("could not parse settings: {0}")]
    Parse(String),

    #[error("singular-rtol must be a finite number in [0, 1), got {0}")]
    BadTolerance(f64),
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self { SettingsError::Parse(e.to_string()) }
}

impl From<serde_yaml::Error> for SettingsError {
    fn from(e: serde_yaml::Error) -> Self { SettingsError::Parse(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_operand_and_the_shapes() {
        let e = MalformedInputError::new(Malformation::Ragged { row: 1, expected: 2, found: 1 })
            .for_operand(Operand::Rhs);
        assert_eq!(e.to_string(), "second matrix: row 1 has length 1, but row 0 has length 2");

        let e = DimensionMismatchError {
            op: Operation::Add,
            requirement: Requirement::SameShape,
            lhs: (2, 3),
            rhs: (3, 2),
        };
        assert_eq!(
            e.to_string(),
            "Matrices must have the same dimensions for addition (add: expected 2x3, found 3x2)",
        );
    }

    #[test]
    fn kind_follows_variant() {
        let e: Error = SingularMatrixError { order: 2, pivot_ratio: 0.0, tolerance: 1e-15 }.into();
        assert_eq!(e.kind(), ErrorKind::SingularMatrix);
        assert!(std::error::Error::source(&e).is_some());
    }
}
