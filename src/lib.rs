/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Foreign-function boundaries for `matcalc_core`.
//!
//! - [`compat`]: the legacy "result or nothing" convention, in Rust.
//! - [`c_api`]: the C ABI (build as `cdylib` or `staticlib`).
//! - `jni_api`: JNI exports for the Android calculator, behind the `jni-support` feature.

#[macro_use] extern crate log;

pub use matcalc_core::{
    Calculator, Error, ErrorKind, ExternalMatrix, Matrix, Operation, Settings, ValidatedSettings,
    add, subtract, multiply, divide, compute,
};

pub mod compat;
pub mod c_api;
pub mod logging;

#[cfg(feature = "jni-support")]
mod jni_api;
