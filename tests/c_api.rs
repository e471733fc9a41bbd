/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use] extern crate matcalc_assert_close;

mod shared;
use self::shared::util::{init_logging, last_error_message, take, OwnedInput};

use matcalc::c_api::*;
use matcalc::Operation;
use pretty_assertions::assert_eq;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

fn compute(op: c_int, a: &OwnedInput, b: &OwnedInput) -> (MatcalcStatus, Option<Vec<Vec<f64>>>) {
    compute_with_settings(op, a, b, None)
}

fn compute_with_settings(
    op: c_int,
    a: &OwnedInput,
    b: &OwnedInput,
    settings: Option<&str>,
) -> (MatcalcStatus, Option<Vec<Vec<f64>>>) {
    let settings = settings.map(|s| CString::new(s).unwrap());
    let settings_ptr = settings.as_ref().map_or(ptr::null(), |s| s.as_ptr());
    let (a, b) = (a.raw(), b.raw());
    let mut out: *mut MatcalcMatrix = ptr::null_mut();
    let status = unsafe { matcalc_compute_with_settings(op, &a, &b, settings_ptr, &mut out) };
    (status, take(out))
}

#[test]
fn legacy_scenarios() {
    init_logging();
    let a = OwnedInput::new(&[[1.0, 2.0], [3.0, 4.0]]);
    let b = OwnedInput::new(&[[5.0, 6.0], [7.0, 8.0]]);
    let (a, b) = (a.raw(), b.raw());

    let sum = take(unsafe { matcalc_add(&a, &b) });
    assert_eq!(sum, Some(vec![vec![6.0, 8.0], vec![10.0, 12.0]]));
    assert_eq!(last_error_message(), None);

    let diff = take(unsafe { matcalc_subtract(&b, &a) });
    assert_eq!(diff, Some(vec![vec![4.0, 4.0], vec![4.0, 4.0]]));

    let prod = take(unsafe { matcalc_multiply(&a, &b) });
    assert_eq!(prod, Some(vec![vec![19.0, 22.0], vec![43.0, 50.0]]));

    let quot = take(unsafe { matcalc_divide(&a, &a) }).unwrap();
    assert_close!(abs=1e-12, quot, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn legacy_failures_are_null() {
    init_logging();
    let two_by_three = OwnedInput::new(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let three_by_two = OwnedInput::new(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    let singular = OwnedInput::new(&[[1.0, 2.0], [2.0, 4.0]]);
    let ragged = OwnedInput::new(&[vec![1.0, 2.0], vec![3.0]]);

    let (x, y) = (two_by_three.raw(), three_by_two.raw());
    assert!(unsafe { matcalc_add(&x, &y) }.is_null());
    assert!(last_error_message().unwrap().contains("same dimensions for addition"));

    assert!(unsafe { matcalc_subtract(&x, &y) }.is_null());
    assert!(last_error_message().unwrap().contains("same dimensions for subtraction"));

    let s = singular.raw();
    assert!(unsafe { matcalc_divide(&s, &s) }.is_null());
    assert!(last_error_message().unwrap().contains("singular"));

    let r = ragged.raw();
    assert!(unsafe { matcalc_multiply(&r, &s) }.is_null());
    assert!(last_error_message().unwrap().contains("first matrix"));

    assert!(unsafe { matcalc_add(ptr::null(), &s) }.is_null());
    assert!(last_error_message().unwrap().contains("null"));
}

#[test]
fn status_distinguishes_failures() {
    init_logging();
    let square = OwnedInput::new(&[[1.0, 2.0], [3.0, 4.0]]);
    let wide = OwnedInput::new(&[[1.0, 2.0, 3.0]]);
    let singular = OwnedInput::new(&[[1.0, 2.0], [2.0, 4.0]]);
    let ragged = OwnedInput::new(&[vec![1.0, 2.0], vec![3.0]]);
    let empty = OwnedInput::new::<Vec<f64>>(&[]);

    let add = Operation::Add.code();
    let mul = Operation::Multiply.code();
    let div = Operation::Divide.code();

    assert_eq!(compute(add, &square, &square).0, MatcalcStatus::Ok);
    assert_eq!(compute(add, &square, &wide), (MatcalcStatus::DimensionMismatch, None));
    assert_eq!(compute(mul, &square, &wide), (MatcalcStatus::DimensionMismatch, None));
    assert_eq!(compute(mul, &wide, &square), (MatcalcStatus::DimensionMismatch, None));
    assert_eq!(compute(div, &square, &wide), (MatcalcStatus::DimensionMismatch, None));
    assert_eq!(compute(div, &square, &singular), (MatcalcStatus::SingularMatrix, None));
    assert_eq!(compute(add, &ragged, &ragged), (MatcalcStatus::MalformedInput, None));
    assert_eq!(compute(add, &square, &empty), (MatcalcStatus::MalformedInput, None));
    assert!(last_error_message().unwrap().contains("second matrix"));
    assert_eq!(compute(17, &square, &square), (MatcalcStatus::InvalidOperation, None));
}

#[test]
fn zero_width_round_trip() {
    let empty_rows = OwnedInput::new(&[Vec::<f64>::new(), vec![]]);
    let (status, out) = compute(Operation::Subtract.code(), &empty_rows, &empty_rows);
    assert_eq!(status, MatcalcStatus::Ok);
    assert_eq!(out, Some(vec![vec![], vec![]]));
}

#[test]
fn null_arguments() {
    let square = OwnedInput::new(&[[1.0]]);
    let a = square.raw();

    let status = unsafe { matcalc_compute(0, &a, &a, ptr::null_mut()) };
    assert_eq!(status, MatcalcStatus::NullArgument);

    let mut out: *mut MatcalcMatrix = ptr::null_mut();
    let status = unsafe { matcalc_compute(0, &a, ptr::null(), &mut out) };
    assert_eq!(status, MatcalcStatus::NullArgument);
    assert!(out.is_null());

    // a null row pointer is only tolerated for an empty row
    let lens = [1usize];
    let rows = [ptr::null::<f64>()];
    let bad = MatcalcInput { num_rows: 1, rows: rows.as_ptr(), row_lens: lens.as_ptr() };
    let status = unsafe { matcalc_compute(0, &bad, &a, &mut out) };
    assert_eq!(status, MatcalcStatus::NullArgument);
}

#[test]
fn settings_json() {
    let nan = OwnedInput::new(&[[f64::NAN, 1.0]]);
    let add = Operation::Add.code();

    assert_eq!(compute(add, &nan, &nan).0, MatcalcStatus::MalformedInput);

    let (status, out) = compute_with_settings(add, &nan, &nan, Some(r#"{"allow-non-finite": true}"#));
    assert_eq!(status, MatcalcStatus::Ok);
    let out = out.unwrap();
    assert!(out[0][0].is_nan());
    assert_eq!(out[0][1], 2.0);

    let (status, _) = compute_with_settings(add, &nan, &nan, Some(r#"{"allow-nonfinite": true}"#));
    assert_eq!(status, MatcalcStatus::InvalidSettings);
    let (status, _) = compute_with_settings(add, &nan, &nan, Some(r#"{"singular-rtol": -1}"#));
    assert_eq!(status, MatcalcStatus::InvalidSettings);

    let near = OwnedInput::new(&[[1.0, 0.0], [0.0, 1e-6]]);
    let div = Operation::Divide.code();
    assert_eq!(compute(div, &near, &near).0, MatcalcStatus::Ok);
    let (status, _) = compute_with_settings(div, &near, &near, Some(r#"{"singular-rtol": 1e-3}"#));
    assert_eq!(status, MatcalcStatus::SingularMatrix);
}

#[test]
fn last_error_is_truncated_and_cleared() {
    let a = OwnedInput::new(&[[1.0, 2.0]]);
    let (status, _) = compute(Operation::Multiply.code(), &a, &a);
    assert_eq!(status, MatcalcStatus::DimensionMismatch);

    let full = last_error_message().unwrap();
    let mut buf = [0x7f as c_char; 8];
    let needed = unsafe { matcalc_last_error_message(buf.as_mut_ptr(), buf.len()) };
    assert_eq!(needed, full.len() + 1);
    let short = unsafe { CStr::from_ptr(buf.as_ptr()) }.to_str().unwrap();
    assert_eq!(short, &full[..7]);

    assert_eq!(compute(Operation::Add.code(), &a, &a).0, MatcalcStatus::Ok);
    assert_eq!(last_error_message(), None);
}

#[test]
fn status_messages() {
    for code in -1..12 {
        let message = unsafe { CStr::from_ptr(matcalc_status_message(code)) };
        assert!(!message.to_bytes().is_empty());
    }
    let ok = unsafe { CStr::from_ptr(matcalc_status_message(MatcalcStatus::Ok as c_int)) };
    assert_eq!(ok.to_str().unwrap(), MatcalcStatus::Ok.message());
}

#[test]
fn concurrent_callers() {
    let handles: Vec<_> = (0..8).map(|i| std::thread::spawn(move || {
        let x = i as f64;
        let a = OwnedInput::new(&[[x, 1.0], [2.0, x]]);
        let b = OwnedInput::new(&[[1.0, 0.0], [0.0, 1.0]]);
        for _ in 0..50 {
            let (status, out) = compute(Operation::Multiply.code(), &a, &b);
            assert_eq!(status, MatcalcStatus::Ok);
            assert_eq!(out.unwrap(), vec![vec![x, 1.0], vec![2.0, x]]);

            // each thread sees only its own failures
            let (status, _) = compute(Operation::Add.code(), &a, &OwnedInput::new(&[[1.0]]));
            assert_eq!(status, MatcalcStatus::DimensionMismatch);
            assert!(last_error_message().is_some());
        }
    })).collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn logger_installs_once() {
    // `init_logging` in the other tests may or may not have run first in this process,
    // so only the second attempt is certain to fail.
    let _ = matcalc_init_logging(0);
    assert_eq!(matcalc_init_logging(1), MatcalcStatus::LoggerError);
    assert!(last_error_message().is_some());
}
