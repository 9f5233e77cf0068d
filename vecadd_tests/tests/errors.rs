// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vecadd_tests::add_sync;

// Length validation happens before any device is opened, so these tests run
// everywhere, GPU or not.

#[test]
fn mismatched_lengths_is_an_error() {
    let err = add_sync(&[1, 2, 3], &[1, 2]).unwrap_err();
    assert!(matches!(
        err,
        vecadd::Error::MismatchedLengths { left: 3, right: 2 }
    ));
}

#[test]
fn mismatched_lengths_reports_both_sides() {
    let err = add_sync(&[], &[7]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("left=0"), "unexpected message: {message}");
    assert!(message.contains("right=1"), "unexpected message: {message}");
}
