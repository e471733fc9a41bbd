/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ndarray::{ArrayBase, Data, Dimension};
use std::fmt;

pub const DEFAULT_REL_TOL: f64 = 1e-9;

/// Panics unless two values are close.
///
/// ```
/// # #[macro_use] extern crate matcalc_assert_close;
/// # fn main() {
/// assert_close!(1.0, 1.0 + 1e-12);
/// assert_close!(abs=1e-8, 0.0, 1e-9);
/// assert_close!(abs=1e-8, rel=0.0, &[1.0, 2.0][..], &[1.0, 2.0][..], "row {}", 3);
/// # }
/// ```
///
/// Tolerances default to `rel=DEFAULT_REL_TOL, abs=0.0`.
#[macro_export]
macro_rules! assert_close {
    (abs=$abs:expr, rel=$rel:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$abs, $rel] $($rest)+)
    };
    (rel=$rel:expr, abs=$abs:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$abs, $rel] $($rest)+)
    };
    (abs=$abs:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$abs, $crate::DEFAULT_REL_TOL] $($rest)+)
    };
    (rel=$rel:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [0.0, $rel] $($rest)+)
    };
    (@go [$abs:expr, $rel:expr] $a:expr, $b:expr $(,)?) => {
        $crate::assert_close!(@go [$abs, $rel] $a, $b, "not nearly equal!")
    };
    (@go [$abs:expr, $rel:expr] $a:expr, $b:expr, $($fmt:tt)+) => {
        match (&$a, &$b) {
            (a, b) => $crate::__assert_close(
                a, b,
                $crate::Tolerances { abs: $abs, rel: $rel },
                format_args!($($fmt)+),
            ),
        }
    };
    ($($rest:tt)+) => {
        $crate::assert_close!(@go [0.0, $crate::DEFAULT_REL_TOL] $($rest)+)
    };
}

#[doc(hidden)]
pub fn __assert_close<A, B>(a: &A, b: &B, tol: Tolerances, msg: fmt::Arguments<'_>)
where
    A: ?Sized + CheckClose<B> + fmt::Debug,
    B: ?Sized + fmt::Debug,
{
    if let Err(e) = a.check_close(b, tol) {
        panic!("{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}", msg, tol.rel, tol.abs, a, b, e);
    }
}

/// Same rule as Python's `math.isclose`.
pub fn is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // equal infinities
    if a == b { return true; }
    // opposite infinities would otherwise get infinite tolerance
    if a.is_infinite() || b.is_infinite() { return false; }
    // NaN fails here
    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckCloseError {
    #[error("failed at:\n  left: {left:?}\n right: {right:?}\n   tol: {tol:?}")]
    Value { left: f64, right: f64, tol: Tolerances },

    #[error("shapes differ: {left:?} vs {right:?}")]
    Shape { left: Vec<usize>, right: Vec<usize> },
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError::Value { left: *self, right: *other, tol }),
        }
    }
}

impl<'a, 'b, A, B> CheckClose<&'b B> for &'a A
where A: ?Sized + CheckClose<B>, B: ?Sized,
{
    fn check_close(&self, other: &&'b B, tol: Tolerances) -> Result<(), CheckCloseError>
    { (**self).check_close(*other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.len() != other.len() {
            return Err(CheckCloseError::Shape { left: vec![self.len()], right: vec![other.len()] });
        }
        self.iter().zip(other).map(|(a, b)| a.check_close(b, tol)).collect()
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(other, tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &[T; N], tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<S, S2, D> CheckClose<ArrayBase<S2, D>> for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    fn check_close(&self, other: &ArrayBase<S2, D>, tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.shape() != other.shape() {
            return Err(CheckCloseError::Shape {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }
        // iteration is in logical order for both, whatever their layouts
        self.iter().zip(other.iter()).map(|(a, b)| a.check_close(b, tol)).collect()
    }
}
