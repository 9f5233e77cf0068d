// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel sources.

use wgpu::Device;

use crate::engine::{BindType, KernelEngine, KernelId};
use crate::Result;

/// Threads per workgroup for 1-D dispatches. The kernel guards against the
/// grid overshooting the array length, so any length is valid.
pub(crate) const WORKGROUP_SIZE: u32 = 64;

// Computes c[i] = a[i] + b[i] for each element. Addition on i32 wraps.
const ADD_I32: &str = r#"
@group(0) @binding(0) var<storage, read> a: array<i32>;
@group(0) @binding(1) var<storage, read> b: array<i32>;
@group(0) @binding(2) var<storage, read_write> c: array<i32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let i = global_id.x;
    if i < arrayLength(&a) {
        c[i] = a[i] + b[i];
    }
}
"#;

/// Kernels for the full set of supported operations.
pub(crate) struct Kernels {
    pub add_i32: KernelId,
}

pub(crate) async fn kernels(device: &Device, engine: &mut KernelEngine) -> Result<Kernels> {
    use BindType::*;

    let add_i32 = engine
        .add_compute_shader(device, "vecadd.add_i32", ADD_I32.into(), &[
            BufReadOnly,
            BufReadOnly,
            Buffer,
        ])
        .await?;
    Ok(Kernels { add_i32 })
}
