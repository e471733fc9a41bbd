/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use matcalc::c_api::{self, MatcalcInput, MatcalcMatrix};
use std::os::raw::c_char;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Owns the row storage behind a `MatcalcInput`.
pub struct OwnedInput {
    // the pointers below point into these rows' buffers
    _rows: Vec<Vec<f64>>,
    ptrs: Vec<*const f64>,
    lens: Vec<usize>,
}

impl OwnedInput {
    pub fn new<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let rows: Vec<Vec<f64>> = rows.iter().map(|row| row.as_ref().to_vec()).collect();
        let ptrs = rows.iter().map(|row| row.as_ptr()).collect();
        let lens = rows.iter().map(|row| row.len()).collect();
        OwnedInput { _rows: rows, ptrs, lens }
    }

    /// Only valid while `self` is alive.
    pub fn raw(&self) -> MatcalcInput {
        MatcalcInput {
            num_rows: self.ptrs.len(),
            rows: self.ptrs.as_ptr(),
            row_lens: self.lens.as_ptr(),
        }
    }
}

/// Read back and free a matrix returned across the C ABI.
pub fn take(matrix: *mut MatcalcMatrix) -> Option<Vec<Vec<f64>>> {
    if matrix.is_null() {
        return None;
    }
    let rows = unsafe { (*matrix).to_rows() };
    unsafe { c_api::matcalc_matrix_free(matrix) };
    Some(rows)
}

pub fn last_error_message() -> Option<String> {
    let needed = unsafe { c_api::matcalc_last_error_message(std::ptr::null_mut(), 0) };
    if needed == 0 {
        return None;
    }
    let mut buf = vec![0u8; needed];
    let written = unsafe { c_api::matcalc_last_error_message(buf.as_mut_ptr() as *mut c_char, buf.len()) };
    assert_eq!(written, needed);
    assert_eq!(buf.pop(), Some(0));
    Some(String::from_utf8(buf).expect("message is UTF-8"))
}
