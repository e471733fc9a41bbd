/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! JNI exports for `com.example.matrixcalculator.MatrixViewModel`.
//!
//! ```kotlin
//! external fun addMatrices(matrixA: Array<DoubleArray>, matrixB: Array<DoubleArray>): Array<DoubleArray>
//! ```
//!
//! and likewise `subtractMatrices`, `multiplyMatrices`, `divideMatrices`.
//! Each returns `null` on failure.

use jni::objects::{JDoubleArray, JObject, JObjectArray};
use jni::sys::{jobjectArray, jsize};
use jni::JNIEnv;
use matcalc_core::{ExternalMatrix, Operation};
use std::convert::TryFrom;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

#[derive(Debug, thiserror::Error)]
enum JniCallError {
    #[error("JNI: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error("matrix is too large for a Java array")]
    TooLarge,

    #[error("{0}")]
    Compute(#[from] matcalc_core::Error),
}

fn read_matrix(env: &mut JNIEnv<'_>, array: &JObjectArray<'_>) -> Result<ExternalMatrix, JniCallError> {
    let num_rows = env.get_array_length(array)?;
    let mut rows = Vec::with_capacity(num_rows as usize);
    for i in 0..num_rows {
        let row = JDoubleArray::from(env.get_object_array_element(array, i)?);
        if row.is_null() {
            // shows up as a ragged row
            rows.push(vec![]);
            continue;
        }
        let mut buf = vec![0.0; env.get_array_length(&row)? as usize];
        env.get_double_array_region(&row, 0, &mut buf)?;
        env.delete_local_ref(row)?;
        rows.push(buf);
    }
    Ok(rows)
}

fn write_matrix(env: &mut JNIEnv<'_>, rows: &[Vec<f64>]) -> Result<jobjectArray, JniCallError> {
    let len = |n: usize| jsize::try_from(n).map_err(|_| JniCallError::TooLarge);

    let out = env.new_object_array(len(rows.len())?, "[D", JObject::null())?;
    for (i, row) in rows.iter().enumerate() {
        let java_row = env.new_double_array(len(row.len())?)?;
        env.set_double_array_region(&java_row, 0, row)?;
        env.set_object_array_element(&out, len(i)?, &java_row)?;
        env.delete_local_ref(java_row)?;
    }
    Ok(out.into_raw())
}

fn call(
    mut env: JNIEnv<'_>,
    op: Operation,
    a: JObjectArray<'_>,
    b: JObjectArray<'_>,
) -> jobjectArray {
    let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<jobjectArray, JniCallError> {
        let a = read_matrix(&mut env, &a)?;
        let b = read_matrix(&mut env, &b)?;
        let out = matcalc_core::compute(op, &a, &b)?;
        write_matrix(&mut env, &out)
    }));
    match result {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => {
            warn!("{} failed: {}", op, e);
            ptr::null_mut()
        },
        Err(_) => {
            warn!("{} panicked", op);
            ptr::null_mut()
        },
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_matrixcalculator_MatrixViewModel_addMatrices<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    matrix_a: JObjectArray<'local>,
    matrix_b: JObjectArray<'local>,
) -> jobjectArray {
    call(env, Operation::Add, matrix_a, matrix_b)
}

#[no_mangle]
pub extern "system" fn Java_com_example_matrixcalculator_MatrixViewModel_subtractMatrices<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    matrix_a: JObjectArray<'local>,
    matrix_b: JObjectArray<'local>,
) -> jobjectArray {
    call(env, Operation::Subtract, matrix_a, matrix_b)
}

#[no_mangle]
pub extern "system" fn Java_com_example_matrixcalculator_MatrixViewModel_multiplyMatrices<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    matrix_a: JObjectArray<'local>,
    matrix_b: JObjectArray<'local>,
) -> jobjectArray {
    call(env, Operation::Multiply, matrix_a, matrix_b)
}

#[no_mangle]
pub extern "system" fn Java_com_example_matrixcalculator_MatrixViewModel_divideMatrices<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    matrix_a: JObjectArray<'local>,
    matrix_b: JObjectArray<'local>,
) -> jobjectArray {
    call(env, Operation::Divide, matrix_a, matrix_b)
}
