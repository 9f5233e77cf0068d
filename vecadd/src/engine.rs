// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::borrow::Cow;

use wgpu::{
    BindGroup, BindGroupLayout, CommandEncoder, ComputePassDescriptor, ComputePipeline, Device,
    PipelineCompilationOptions,
};

use crate::{Error, Result};

/// Handle to a kernel registered with a [`KernelEngine`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct KernelId(usize);

/// The type of resource that will be bound to a slot in a kernel.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindType {
    /// A storage buffer with read/write access.
    Buffer,
    /// A storage buffer with read only access.
    BufReadOnly,
}

struct Shader {
    label: &'static str,
    pipeline: ComputePipeline,
    bind_group_layout: BindGroupLayout,
}

/// Registry of compiled compute pipelines.
///
/// Kernels are compiled once, at registration, and looked up by id on every
/// dispatch afterwards. The registry is bound to the device its kernels were
/// compiled for.
#[derive(Default)]
pub(crate) struct KernelEngine {
    shaders: Vec<Shader>,
}

impl KernelEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a kernel and add it to the registry.
    ///
    /// The entry point is hardcoded as "main" and only one bind group is
    /// supported. Compilation runs under a validation error scope so a bad
    /// source comes back as [`Error::KernelBuild`] carrying the backend's
    /// diagnostic, rather than tripping the uncaptured-error handler.
    pub async fn add_compute_shader(
        &mut self,
        device: &Device,
        label: &'static str,
        wgsl: Cow<'static, str>,
        layout: &[BindType],
    ) -> Result<KernelId> {
        let entries = Self::create_bind_group_layout_entries(layout.iter().copied());

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(wgsl),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &entries,
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: "main",
            compilation_options: PipelineCompilationOptions::default(),
            cache: None,
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(Error::KernelBuild(error.to_string()));
        }

        let id = self.shaders.len();
        self.shaders.push(Shader {
            label,
            pipeline,
            bind_group_layout,
        });
        Ok(KernelId(id))
    }

    pub fn bind_group_layout(&self, kernel: KernelId) -> &BindGroupLayout {
        &self.shaders[kernel.0].bind_group_layout
    }

    /// Records one compute pass dispatching the kernel over a 1-D grid.
    pub fn dispatch(
        &self,
        encoder: &mut CommandEncoder,
        kernel: KernelId,
        bind_group: &BindGroup,
        workgroups: u32,
    ) {
        // Zero-sized dispatches are rejected by some backends.
        if workgroups == 0 {
            return;
        }
        let shader = &self.shaders[kernel.0];
        log::debug!("dispatching {workgroups} workgroup(s) for '{}'", shader.label);
        let mut cpass = encoder.begin_compute_pass(&ComputePassDescriptor::default());
        cpass.set_pipeline(&shader.pipeline);
        cpass.set_bind_group(0, bind_group, &[]);
        cpass.dispatch_workgroups(workgroups, 1, 1);
    }

    fn create_bind_group_layout_entries(
        layout: impl Iterator<Item = BindType>,
    ) -> Vec<wgpu::BindGroupLayoutEntry> {
        layout
            .enumerate()
            .map(|(i, bind_type)| wgpu::BindGroupLayoutEntry {
                binding: i as u32,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage {
                        read_only: bind_type == BindType::BufReadOnly,
                    },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect::<Vec<_>>()
    }
}
