/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::convert::{self, ExternalMatrix};
use crate::{Error, Matrix, Operand, Operation, ValidatedSettings};

/// Row-of-rows in, row-of-rows out.
///
/// Each call converts both operands, applies one [`Operation`] and converts the
/// result back. Nothing is kept between calls, so a `Calculator` can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    settings: ValidatedSettings,
}

impl Calculator {
    pub fn new(settings: ValidatedSettings) -> Self { Calculator { settings } }

    pub fn settings(&self) -> &ValidatedSettings { &self.settings }

    /// Convert one operand, tagging conversion errors with the operand's position.
    pub fn read<R: AsRef<[f64]>>(&self, operand: Operand, rows: &[R]) -> Result<Matrix, Error> {
        convert::to_matrix_impl(rows, self.settings.allow_non_finite)
            .map_err(|e| e.for_operand(operand).into())
    }

    pub fn compute<A, B>(&self, op: Operation, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
    where A: AsRef<[f64]>, B: AsRef<[f64]>,
    {
        let a = self.read(Operand::Lhs, a)?;
        let b = self.read(Operand::Rhs, b)?;
        trace!("{}: {:?} {} {:?}", op, a.dims(), op.symbol(), b.dims());

        let out = op.apply_with_rtol(&a, &b, self.settings.singular_rtol)?;
        Ok(convert::to_external(&out))
    }

    pub fn add<A, B>(&self, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
    where A: AsRef<[f64]>, B: AsRef<[f64]>,
    { self.compute(Operation::Add, a, b) }

    pub fn subtract<A, B>(&self, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
    where A: AsRef<[f64]>, B: AsRef<[f64]>,
    { self.compute(Operation::Subtract, a, b) }

    pub fn multiply<A, B>(&self, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
    where A: AsRef<[f64]>, B: AsRef<[f64]>,
    { self.compute(Operation::Multiply, a, b) }

    /// `a b⁻¹`
    pub fn divide<A, B>(&self, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
    where A: AsRef<[f64]>, B: AsRef<[f64]>,
    { self.compute(Operation::Divide, a, b) }
}

/// [`Calculator::compute`] with default settings.
pub fn compute<A, B>(op: Operation, a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ Calculator::default().compute(op, a, b) }

/// Elementwise sum, with default settings.
pub fn add<A, B>(a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute(Operation::Add, a, b) }

/// Elementwise difference, with default settings.
pub fn subtract<A, B>(a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute(Operation::Subtract, a, b) }

/// Matrix product, with default settings.
pub fn multiply<A, B>(a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute(Operation::Multiply, a, b) }

/// `a b⁻¹`, with default settings.
pub fn divide<A, B>(a: &[A], b: &[B]) -> Result<ExternalMatrix, Error>
where A: AsRef<[f64]>, B: AsRef<[f64]>,
{ compute(Operation::Divide, a, b) }
