/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! C ABI. See `include/matcalc.h` for the C side of these declarations.
//!
//! There are two calling conventions:
//!
//! - `matcalc_add` and friends return a matrix, or null on any failure.
//! - `matcalc_compute` and `matcalc_compute_with_settings` return a [`MatcalcStatus`]
//!   that says what went wrong.
//!
//! Either way, the message of the last failure on the calling thread can be
//! retrieved with `matcalc_last_error_message`.
//!
//! No panic crosses this boundary.

use crate::logging::GlobalLogger;
use matcalc_core::{Calculator, ErrorKind, Operation, Settings};
use std::any::Any;
use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::{ptr, slice};

/// Borrowed row-of-rows matrix.
///
/// `rows[i]` points to `row_lens[i]` doubles. Rows may differ in length at this
/// level; such input is rejected as malformed.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct MatcalcInput {
    pub num_rows: usize,
    pub rows: *const *const f64,
    pub row_lens: *const usize,
}

/// Owned rectangular matrix, allocated by this library.
///
/// Release it with `matcalc_matrix_free`. C code reads the fields directly;
/// Rust code can only obtain one from this library.
///
/// ```compile_fail
/// let bogus = matcalc::c_api::MatcalcMatrix {
///     num_rows: 1,
///     num_cols: 1,
///     data: std::ptr::null_mut(),
/// };
/// ```
#[repr(C)]
#[derive(Debug)]
pub struct MatcalcMatrix {
    num_rows: usize,
    num_cols: usize,
    /// Row-major.
    // invariant: came from a `Box<[f64]>` of length `num_rows * num_cols`
    data: *mut f64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MatcalcStatus {
    Ok = 0,
    NullArgument = 1,
    MalformedInput = 2,
    DimensionMismatch = 3,
    SingularMatrix = 4,
    InvalidOperation = 5,
    InvalidSettings = 6,
    LoggerError = 7,
    Panic = 8,
}

impl MatcalcStatus {
    const ALL: [MatcalcStatus; 9] = [
        MatcalcStatus::Ok,
        MatcalcStatus::NullArgument,
        MatcalcStatus::MalformedInput,
        MatcalcStatus::DimensionMismatch,
        MatcalcStatus::SingularMatrix,
        MatcalcStatus::InvalidOperation,
        MatcalcStatus::InvalidSettings,
        MatcalcStatus::LoggerError,
        MatcalcStatus::Panic,
    ];

    pub fn from_code(code: c_int) -> Option<Self> {
        MatcalcStatus::ALL.iter().cloned().find(|&s| s as c_int == code)
    }

    // nul-terminated, for C
    fn c_message(self) -> &'static [u8] {
        match self {
            MatcalcStatus::Ok => b"success\0",
            MatcalcStatus::NullArgument => b"a required pointer argument was null\0",
            MatcalcStatus::MalformedInput => b"an input matrix was empty, ragged or non-finite\0",
            MatcalcStatus::DimensionMismatch => b"matrix dimensions are incompatible with the operation\0",
            MatcalcStatus::SingularMatrix => b"the divisor matrix is singular\0",
            MatcalcStatus::InvalidOperation => b"unknown operation code\0",
            MatcalcStatus::InvalidSettings => b"settings could not be parsed or are invalid\0",
            MatcalcStatus::LoggerError => b"the logger could not be installed\0",
            MatcalcStatus::Panic => b"internal error\0",
        }
    }

    pub fn message(self) -> &'static str {
        let bytes = self.c_message();
        std::str::from_utf8(&bytes[..bytes.len() - 1]).unwrap_or("")
    }
}

#[derive(Debug, thiserror::Error)]
enum CallError {
    #[error("null pointer given for {0}")]
    NullArgument(&'static str),

    #[error("unknown operation code {0}")]
    InvalidOperation(c_int),

    #[error("settings are not valid UTF-8")]
    SettingsEncoding,

    #[error("{0}")]
    Compute(#[from] matcalc_core::Error),

    #[error("internal error: {0}")]
    Panic(String),
}

impl CallError {
    fn status(&self) -> MatcalcStatus {
        match self {
            CallError::NullArgument(_) => MatcalcStatus::NullArgument,
            CallError::InvalidOperation(_) => MatcalcStatus::InvalidOperation,
            CallError::SettingsEncoding => MatcalcStatus::InvalidSettings,
            CallError::Panic(_) => MatcalcStatus::Panic,
            CallError::Compute(e) => match e.kind() {
                ErrorKind::MalformedInput => MatcalcStatus::MalformedInput,
                ErrorKind::DimensionMismatch => MatcalcStatus::DimensionMismatch,
                ErrorKind::SingularMatrix => MatcalcStatus::SingularMatrix,
                ErrorKind::InvalidSettings => MatcalcStatus::InvalidSettings,
            },
        }
    }
}

//------------------------------------------------------------------------------
// last error

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = RefCell::new(None);
}

fn set_last_error(message: String) {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(message));
}

fn clear_last_error() {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = None);
}

//------------------------------------------------------------------------------
// marshalling

impl MatcalcMatrix {
    fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |row| row.len());
        let data: Box<[f64]> = rows.into_iter().flatten().collect();
        debug_assert_eq!(data.len(), num_rows * num_cols);
        MatcalcMatrix { num_rows, num_cols, data: Box::into_raw(data) as *mut f64 }
    }

    pub fn num_rows(&self) -> usize { self.num_rows }
    pub fn num_cols(&self) -> usize { self.num_cols }

    /// Row-major.
    pub fn as_slice(&self) -> &[f64] {
        unsafe { slice::from_raw_parts(self.data, self.num_rows * self.num_cols) }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        match self.num_cols {
            0 => vec![vec![]; self.num_rows],
            n => self.as_slice().chunks(n).map(|row| row.to_vec()).collect(),
        }
    }
}

impl Drop for MatcalcMatrix {
    fn drop(&mut self) {
        let len = self.num_rows * self.num_cols;
        drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(self.data, len)) });
    }
}

/// # Safety
///
/// `input` must be null or point to a valid `MatcalcInput` whose pointers are valid
/// for the advertised lengths, for the duration of `'a`.
unsafe fn read_input<'a>(input: *const MatcalcInput, what: &'static str) -> Result<Vec<&'a [f64]>, CallError> {
    let input = unsafe { input.as_ref() }.ok_or(CallError::NullArgument(what))?;
    if input.num_rows == 0 {
        return Ok(vec![]); // rejected later as having no rows
    }
    if input.rows.is_null() || input.row_lens.is_null() {
        return Err(CallError::NullArgument(what));
    }

    let (ptrs, lens) = unsafe {(
        slice::from_raw_parts(input.rows, input.num_rows),
        slice::from_raw_parts(input.row_lens, input.num_rows),
    )};
    ptrs.iter().zip(lens).map(|(&ptr, &len)| match (ptr.is_null(), len) {
        (_, 0) => Ok(&[][..]),
        (true, _) => Err(CallError::NullArgument(what)),
        (false, len) => Ok(unsafe { slice::from_raw_parts(ptr, len) }),
    }).collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs one call and translates the outcome for C.
fn finish<F>(label: &str, body: F) -> (MatcalcStatus, *mut MatcalcMatrix)
where F: FnOnce() -> Result<MatcalcMatrix, CallError>,
{
    let result = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(CallError::Panic(panic_message(&*payload))),
    };
    match result {
        Ok(matrix) => {
            clear_last_error();
            (MatcalcStatus::Ok, Box::into_raw(Box::new(matrix)))
        },
        Err(e) => {
            let status = e.status();
            warn!("{} failed ({:?}): {}", label, status, e);
            set_last_error(e.to_string());
            (status, ptr::null_mut())
        },
    }
}

unsafe fn compute_raw(
    calculator: &Calculator,
    op: Operation,
    a: *const MatcalcInput,
    b: *const MatcalcInput,
) -> Result<MatcalcMatrix, CallError> {
    let a = unsafe { read_input(a, "first matrix") }?;
    let b = unsafe { read_input(b, "second matrix") }?;
    let out = calculator.compute(op, &a, &b)?;
    Ok(MatcalcMatrix::from_rows(out))
}

unsafe fn legacy(op: Operation, a: *const MatcalcInput, b: *const MatcalcInput) -> *mut MatcalcMatrix {
    let calculator = Calculator::default();
    finish(op.name(), || unsafe { compute_raw(&calculator, op, a, b) }).1
}

//------------------------------------------------------------------------------
// exports

/// Elementwise sum, or null on failure.
///
/// # Safety
///
/// `a` and `b` must each be null or point to a valid [`MatcalcInput`].
#[no_mangle]
pub unsafe extern "C" fn matcalc_add(a: *const MatcalcInput, b: *const MatcalcInput) -> *mut MatcalcMatrix
{ unsafe { legacy(Operation::Add, a, b) } }

/// Elementwise difference, or null on failure.
///
/// # Safety
///
/// See [`matcalc_add`].
#[no_mangle]
pub unsafe extern "C" fn matcalc_subtract(a: *const MatcalcInput, b: *const MatcalcInput) -> *mut MatcalcMatrix
{ unsafe { legacy(Operation::Subtract, a, b) } }

/// Matrix product, or null on failure.
///
/// # Safety
///
/// See [`matcalc_add`].
#[no_mangle]
pub unsafe extern "C" fn matcalc_multiply(a: *const MatcalcInput, b: *const MatcalcInput) -> *mut MatcalcMatrix
{ unsafe { legacy(Operation::Multiply, a, b) } }

/// `a b⁻¹`, or null on failure.
///
/// # Safety
///
/// See [`matcalc_add`].
#[no_mangle]
pub unsafe extern "C" fn matcalc_divide(a: *const MatcalcInput, b: *const MatcalcInput) -> *mut MatcalcMatrix
{ unsafe { legacy(Operation::Divide, a, b) } }

/// Apply operation `op` (0 add, 1 subtract, 2 multiply, 3 divide).
///
/// On success `*out` receives the result. On failure it receives null.
///
/// # Safety
///
/// `a` and `b` as for [`matcalc_add`]; `out` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn matcalc_compute(
    op: c_int,
    a: *const MatcalcInput,
    b: *const MatcalcInput,
    out: *mut *mut MatcalcMatrix,
) -> MatcalcStatus {
    unsafe { matcalc_compute_with_settings(op, a, b, ptr::null(), out) }
}

/// Like [`matcalc_compute`], with settings given as a JSON document such as
/// `{"singular-rtol": 1e-12, "allow-non-finite": false}`. Null means defaults.
///
/// # Safety
///
/// As for [`matcalc_compute`]; `settings_json` must be null or a nul-terminated string.
#[no_mangle]
pub unsafe extern "C" fn matcalc_compute_with_settings(
    op: c_int,
    a: *const MatcalcInput,
    b: *const MatcalcInput,
    settings_json: *const c_char,
    out: *mut *mut MatcalcMatrix,
) -> MatcalcStatus {
    let (status, matrix) = finish("compute", || {
        if out.is_null() {
            return Err(CallError::NullArgument("output pointer"));
        }
        let op = Operation::from_code(op).ok_or(CallError::InvalidOperation(op))?;
        let calculator = match unsafe { settings_json.as_ref() } {
            None => Calculator::default(),
            Some(_) => {
                let json = unsafe { CStr::from_ptr(settings_json) }.to_str()
                    .map_err(|_| CallError::SettingsEncoding)?;
                let settings = Settings::from_json_str(json).map_err(matcalc_core::Error::from)?;
                Calculator::new(settings)
            },
        };
        unsafe { compute_raw(&calculator, op, a, b) }
    });
    if let Some(out) = unsafe { out.as_mut() } {
        *out = matrix;
    }
    status
}

/// Release a matrix returned by this library. Null is ignored.
///
/// # Safety
///
/// `matrix` must be null or a pointer obtained from this library that has not yet been freed.
#[no_mangle]
pub unsafe extern "C" fn matcalc_matrix_free(matrix: *mut MatcalcMatrix) {
    if !matrix.is_null() {
        drop(unsafe { Box::from_raw(matrix) });
    }
}

/// Copy the message of the calling thread's last failure into `buf` (truncated to fit,
/// always nul-terminated when `len > 0`).
///
/// Returns the size needed for the whole message including the nul, or 0 if the last
/// call succeeded.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn matcalc_last_error_message(buf: *mut c_char, len: usize) -> usize {
    LAST_ERROR.with(|cell| {
        let cell = cell.borrow();
        let bytes = match cell.as_ref() {
            None => return 0,
            Some(message) => message.as_bytes(),
        };
        if !buf.is_null() && len > 0 {
            let n = usize::min(bytes.len(), len - 1);
            unsafe {
                ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, buf, n);
                *buf.add(n) = 0;
            }
        }
        bytes.len() + 1
    })
}

/// Static description of a status code. Never null.
#[no_mangle]
pub extern "C" fn matcalc_status_message(status: c_int) -> *const c_char {
    let message: &'static [u8] = match MatcalcStatus::from_code(status) {
        Some(status) => status.c_message(),
        None => b"unknown status\0",
    };
    message.as_ptr() as *const c_char
}

/// Install a stderr logger. Negative verbosity is quiet, positive is loud.
#[no_mangle]
pub extern "C" fn matcalc_init_logging(verbosity: c_int) -> MatcalcStatus {
    match GlobalLogger::default().verbosity(verbosity).apply() {
        Ok(()) => {
            clear_last_error();
            MatcalcStatus::Ok
        },
        Err(e) => {
            set_last_error(e.to_string());
            MatcalcStatus::LoggerError
        },
    }
}
