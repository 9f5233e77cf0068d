// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vecadd_tests::{add_sync, Session};

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn deterministic_across_runs() {
    let session = Session::new().unwrap();
    let a = [3, 1, 4, 1, 5, 9, 2, 6];
    let b = [2, 7, 1, 8, 2, 8, 1, 8];
    let first = session.run(&a, &b).unwrap();
    let second = session.run(&a, &b).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, vec![5, 8, 5, 9, 7, 17, 3, 14]);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn empty_inputs_yield_empty_result() {
    let result = add_sync(&[], &[]).unwrap();
    assert!(result.is_empty());
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn length_not_a_workgroup_multiple() {
    // 1000 is not divisible by the workgroup size; the tail must still be
    // computed and nothing past it written.
    let n = 1000;
    let a: Vec<i32> = (0..n).collect();
    let b: Vec<i32> = (0..n).map(|i| i * 10).collect();
    let result = add_sync(&a, &b).unwrap();
    assert_eq!(result.len(), n as usize);
    for (i, value) in result.iter().enumerate() {
        assert_eq!(*value, (i as i32) * 11, "mismatch at index {i}");
    }
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn wrapping_matches_cpu_semantics() {
    let a = [i32::MAX, i32::MIN, -1, i32::MAX];
    let b = [i32::MAX, i32::MIN, i32::MIN, 0];
    let expected: Vec<i32> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| x.wrapping_add(*y))
        .collect();
    let result = add_sync(&a, &b).unwrap();
    assert_eq!(result, expected);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn session_reuses_compiled_kernel_for_different_sizes() {
    let session = Session::new().unwrap();
    assert_eq!(session.run(&[1], &[2]).unwrap(), vec![3]);
    let a: Vec<i32> = (0..130).collect();
    let b: Vec<i32> = vec![1; 130];
    let result = session.run(&a, &b).unwrap();
    assert_eq!(result[0], 1);
    assert_eq!(result[129], 130);
}
