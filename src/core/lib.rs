/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrix arithmetic on row-of-rows input.
//!
//! ```
//! let sum = matcalc_core::add(&[[1.0, 2.0], [3.0, 4.0]], &[[5.0, 6.0], [7.0, 8.0]])?;
//! assert_eq!(sum, vec![vec![6.0, 8.0], vec![10.0, 12.0]]);
//! # Ok::<(), matcalc_core::Error>(())
//! ```
//!
//! This crate knows nothing about foreign-function boundaries; see the `matcalc`
//! crate for those.

#[macro_use] extern crate log;
#[cfg(test)]
#[macro_use] extern crate matcalc_assert_close;

pub use crate::error::{
    Error, ErrorKind, Operand, Requirement,
    MalformedInputError, Malformation,
    DimensionMismatchError, SingularMatrixError, SettingsError,
};
mod error;

pub use crate::matrix::Matrix;
mod matrix;

pub use crate::convert::{ExternalMatrix, to_matrix, to_external};
pub mod convert;

pub use crate::ops::{Operation, ParseOperationError};
pub mod ops;

pub mod inverse;

pub use crate::settings::{Settings, ValidatedSettings};
mod settings;

pub use crate::calculator::{Calculator, compute, add, subtract, multiply, divide};
mod calculator;

pub mod cells;
