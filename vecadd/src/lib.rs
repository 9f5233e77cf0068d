// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vecadd computes element-wise sums of `i32` vectors on a GPU (or other
//! compute-capable adapter), using [`wgpu`].
//!
//! The crate does deliberately little: it picks an adapter, compiles a fixed
//! WGSL kernel, uploads the two inputs, dispatches one work-item per element,
//! and reads the result back. Its value is that the whole call path is typed
//! and recoverable. Every failure mode — no backend exposing adapters, no
//! adapter matching the requested selection, the kernel failing to compile,
//! or the backend erroring mid-run — comes back as an [`Error`] variant, and
//! the caller decides whether that is fatal.
//!
//! ## Getting started
//!
//! The one-shot entry point opens the first available adapter, runs the
//! addition, and tears everything down again:
//!
//! ```ignore
//! let sum = pollster::block_on(vecadd::add_i32(&[1, 2, 3, 4], &[10, 20, 30, 40]))?;
//! assert_eq!(sum, vec![11, 22, 33, 44]);
//! ```
//!
//! Callers that run more than once should keep a [`util::GpuContext`] and a
//! [`VecAdd`] around; the kernel is compiled when the runner is created and
//! reused by every [`VecAdd::run`] after that:
//!
//! ```ignore
//! let mut context = vecadd::util::GpuContext::new();
//! let dev_id = context.device(&AdapterSelection::First).await?;
//! let handle = &context.devices[dev_id];
//! let runner = VecAdd::new(&handle.device).await?;
//! let sum = runner.run(&handle.device, &handle.queue, &a, &b).await?;
//! ```
//!
//! Addition is two's-complement wrapping, matching `i32` overflow semantics
//! on every backend wgpu targets.

#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
#![allow(
    clippy::cast_possible_truncation,
    reason = "buffer sizes are validated against device limits before any cast matters"
)]

mod engine;
mod shaders;

pub mod util;

pub use wgpu;

use thiserror::Error;
use wgpu::{
    BindGroupDescriptor, BindGroupEntry, BufferDescriptor, BufferUsages,
    CommandEncoderDescriptor, Device, Queue,
};

use engine::KernelEngine;
use shaders::Kernels;

/// Errors that can occur in Vecadd.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No backend exposed any adapter at all. Usually means no usable
    /// driver stack is installed (or none is visible in this environment).
    #[error("no compute platform available (no backend exposed any adapter)")]
    NoPlatform,
    /// Adapters exist, but none matched the requested [`AdapterSelection`].
    ///
    /// [`AdapterSelection`]: util::AdapterSelection
    #[error("no adapter matched the requested selection")]
    NoDevice,
    /// The selected adapter refused to open a logical device.
    /// See [`wgpu::RequestDeviceError`] for more information.
    #[error("couldn't open a logical device on the selected adapter")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    /// The kernel source failed to compile; the payload is the backend's
    /// diagnostic output. Not retried.
    #[error("kernel failed to compile:\n{0}")]
    KernelBuild(String),
    /// The two input vectors have different lengths.
    #[error("input vectors have mismatched lengths (left={left}, right={right})")]
    MismatchedLengths { left: usize, right: usize },
    /// The backend reported an error while allocating, uploading, dispatching
    /// or copying. See [`wgpu::Error`] for more information.
    #[error("backend error while executing")]
    Execution(#[from] wgpu::Error),
    /// Failed to map the result buffer for readback.
    /// See [`wgpu::BufferAsyncError`] for more information.
    #[error("failed to map result buffer for readback")]
    ReadbackMap(#[from] wgpu::BufferAsyncError),
    /// The readback channel closed before delivering a map result.
    #[error("readback channel closed before a result was delivered")]
    ReadbackChannelClosed,
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// Reusable vector-add runner bound to one device.
///
/// Creating a `VecAdd` compiles and registers the kernel; [`VecAdd::run`]
/// only uploads, dispatches and reads back. Keep one per device for repeated
/// additions rather than paying the compile on every call.
pub struct VecAdd {
    engine: KernelEngine,
    kernels: Kernels,
}

impl VecAdd {
    /// Compiles the kernel for `device` and returns a runner that can be
    /// used for any number of [`run`](Self::run) calls on that device.
    pub async fn new(device: &Device) -> Result<Self> {
        let mut engine = KernelEngine::new();
        let kernels = shaders::kernels(device, &mut engine).await?;
        Ok(Self { engine, kernels })
    }

    /// Adds `a` and `b` element-wise on the device and returns the sums.
    ///
    /// The call is synchronous from the caller's perspective: it blocks on
    /// the queue until the dispatch and both transfers have completed. The
    /// inputs must have equal lengths. Empty inputs return an empty vector
    /// without issuing any device work. Overflow wraps.
    pub async fn run(
        &self,
        device: &Device,
        queue: &Queue,
        a: &[i32],
        b: &[i32],
    ) -> Result<Vec<i32>> {
        if a.len() != b.len() {
            return Err(Error::MismatchedLengths {
                left: a.len(),
                right: b.len(),
            });
        }
        if a.is_empty() {
            return Ok(Vec::new());
        }
        let n = a.len();
        let size = std::mem::size_of_val(a) as u64;

        // Everything up to the submit runs under error scopes, so allocation
        // and validation failures surface as `Error::Execution` instead of
        // reaching the uncaptured-error handler.
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let buf_a = device.create_buffer(&BufferDescriptor {
            label: Some("vecadd.input_a"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let buf_b = device.create_buffer(&BufferDescriptor {
            label: Some("vecadd.input_b"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let buf_out = device.create_buffer(&BufferDescriptor {
            label: Some("vecadd.output"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        queue.write_buffer(&buf_a, 0, bytemuck::cast_slice(a));
        queue.write_buffer(&buf_b, 0, bytemuck::cast_slice(b));

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("vecadd.bind_group"),
            layout: self.engine.bind_group_layout(self.kernels.add_i32),
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: buf_a.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: buf_b.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: buf_out.as_entire_binding(),
                },
            ],
        });

        let readback = device.create_buffer(&BufferDescriptor {
            label: Some("vecadd.readback"),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("vecadd.run"),
        });
        let workgroups = (n as u32).div_ceil(shaders::WORKGROUP_SIZE);
        self.engine
            .dispatch(&mut encoder, self.kernels.add_i32, &bind_group, workgroups);
        encoder.copy_buffer_to_buffer(&buf_out, 0, &readback, 0, size);
        queue.submit(Some(encoder.finish()));

        // Both scopes must be popped, error or not.
        let validation = device.pop_error_scope().await;
        let oom = device.pop_error_scope().await;
        if let Some(error) = validation.or(oom) {
            return Err(Error::Execution(error));
        }

        let buf_slice = readback.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        buf_slice.map_async(wgpu::MapMode::Read, move |v| sender.send(v).unwrap());
        device.poll(wgpu::Maintain::Wait).panic_on_timeout();
        match receiver.receive().await {
            Some(map_result) => map_result?,
            None => return Err(Error::ReadbackChannelClosed),
        }

        let data = buf_slice.get_mapped_range();
        let result = bytemuck::cast_slice::<u8, i32>(&data).to_vec();
        drop(data);
        readback.unmap();
        Ok(result)
    }
}

/// One-shot element-wise addition on the first available adapter.
///
/// Builds a fresh [`util::GpuContext`], opens the first adapter any backend
/// exposes, compiles the kernel and runs once; nothing is cached across
/// calls. The device is opened even for empty inputs, so an absent device is
/// always reported as an error rather than masked by an empty result.
pub async fn add_i32(a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
    if a.len() != b.len() {
        return Err(Error::MismatchedLengths {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut context = util::GpuContext::new();
    let dev_id = context.device(&util::AdapterSelection::First).await?;
    let handle = &context.devices[dev_id];
    let runner = VecAdd::new(&handle.device).await?;
    runner.run(&handle.device, &handle.queue, a, b).await
}
