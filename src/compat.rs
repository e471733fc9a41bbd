/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The legacy calling convention: a result, or nothing at all.
//!
//! Callers of these functions cannot tell a malformed matrix from a dimension
//! mismatch from a singular divisor. The error is logged before it is dropped.

use matcalc_core::{Error, ExternalMatrix, Operation};

/// Drop the error from a result, leaving a trace of it in the log.
pub fn collapse<T>(op: Operation, result: Result<T, Error>) -> Option<T> {
    match result {
        Ok(x) => Some(x),
        Err(e) => {
            warn!("{} failed ({:?}): {}", op, e.kind(), e);
            None
        },
    }
}

pub fn compute_or_none<A, B>(op: Operation, a: &[A], b: &[B]) -> Option<ExternalMatrix>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ collapse(op, matcalc_core::compute(op, a, b)) }

pub fn add_or_none<A, B>(a: &[A], b: &[B]) -> Option<ExternalMatrix>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute_or_none(Operation::Add, a, b) }

pub fn subtract_or_none<A, B>(a: &[A], b: &[B]) -> Option<ExternalMatrix>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute_or_none(Operation::Subtract, a, b) }

pub fn multiply_or_none<A, B>(a: &[A], b: &[B]) -> Option<ExternalMatrix>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute_or_none(Operation::Multiply, a, b) }

pub fn divide_or_none<A, B>(a: &[A], b: &[B]) -> Option<ExternalMatrix>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute_or_none(Operation::Divide, a, b) }
