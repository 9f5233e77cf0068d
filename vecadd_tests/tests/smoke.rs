// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vecadd_tests::add_sync;

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn add_small_vectors() {
    let result = add_sync(&[1, 2, 3, 4], &[10, 20, 30, 40]).unwrap();
    assert_eq!(result, vec![11, 22, 33, 44]);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn add_with_negatives_cancels_out() {
    let result = add_sync(&[-5, 0, 5], &[5, 0, -5]).unwrap();
    assert_eq!(result, vec![0, 0, 0]);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn add_wraps_on_overflow() {
    let result = add_sync(&[i32::MAX], &[1]).unwrap();
    assert_eq!(result, vec![i32::MIN]);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn single_element() {
    let result = add_sync(&[41], &[1]).unwrap();
    assert_eq!(result, vec![42]);
}
