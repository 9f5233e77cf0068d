// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple helpers for managing wgpu state and adapter selection.

use wgpu::{Adapter, Backends, Device, Instance, Queue};

use crate::{Error, Result};

/// Strategy for choosing an adapter out of everything the backends expose.
///
/// The default is [`First`](Self::First): whatever the instance enumerates
/// first, with no ranking. The other strategies let integrators pin a
/// specific adapter instead of relying on enumeration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AdapterSelection {
    /// The first enumerated adapter, regardless of kind.
    #[default]
    First,
    /// The adapter at this position in the enumeration order.
    Index(usize),
    /// Any adapter whose name contains this string (case-insensitive).
    Name(String),
    /// Any adapter of the given device type.
    DeviceType(wgpu::DeviceType),
}

/// Simple context that maintains wgpu state for running kernels.
pub struct GpuContext {
    pub instance: Instance,
    pub devices: Vec<DeviceHandle>,
}

pub struct DeviceHandle {
    adapter: Adapter,
    /// Position of `adapter` in the enumeration order at open time.
    adapter_index: usize,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    #[expect(
        clippy::new_without_default,
        reason = "Creating a wgpu Instance is something which should only be done rarely"
    )]
    pub fn new() -> Self {
        let backends = wgpu::util::backend_bits_from_env().unwrap_or_default();
        let flags = wgpu::InstanceFlags::from_build_config().with_env();
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends,
            flags,
            ..Default::default()
        });
        Self {
            instance,
            devices: Vec::new(),
        }
    }

    /// Enumerates every adapter of every backend, in backend order.
    pub fn adapters(&self) -> Vec<Adapter> {
        self.instance.enumerate_adapters(Backends::all())
    }

    /// Finds or creates a device handle id matching the selection.
    ///
    /// A handle opened by an earlier call is reused when its adapter still
    /// satisfies `selection`; otherwise the adapters are enumerated again and
    /// a new logical device is opened.
    pub async fn device(&mut self, selection: &AdapterSelection) -> Result<usize> {
        let existing = self
            .devices
            .iter()
            .enumerate()
            .find(|(_, d)| selection_matches(selection, d.adapter_index, &d.adapter.get_info()))
            .map(|(i, _)| i);
        match existing {
            Some(id) => Ok(id),
            None => self.new_device(selection).await,
        }
    }

    /// Creates a device handle id matching the selection.
    async fn new_device(&mut self, selection: &AdapterSelection) -> Result<usize> {
        let adapters = self.adapters();
        if adapters.is_empty() {
            return Err(Error::NoPlatform);
        }
        let (adapter_index, adapter) = adapters
            .into_iter()
            .enumerate()
            .find(|(index, adapter)| selection_matches(selection, *index, &adapter.get_info()))
            .ok_or(Error::NoDevice)?;
        let info = adapter.get_info();
        log::info!(
            "using adapter '{}' ({:?}, {:?} backend)",
            info.name,
            info.device_type,
            info.backend
        );
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;
        self.devices.push(DeviceHandle {
            adapter,
            adapter_index,
            device,
            queue,
        });
        Ok(self.devices.len() - 1)
    }
}

impl DeviceHandle {
    /// Returns the adapter associated with the device.
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

fn selection_matches(
    selection: &AdapterSelection,
    index: usize,
    info: &wgpu::AdapterInfo,
) -> bool {
    match selection {
        AdapterSelection::First => true,
        AdapterSelection::Index(want) => index == *want,
        AdapterSelection::Name(want) => info
            .name
            .to_ascii_lowercase()
            .contains(&want.to_ascii_lowercase()),
        AdapterSelection::DeviceType(want) => info.device_type == *want,
    }
}

#[cfg(test)]
mod tests {
    use super::{selection_matches, AdapterSelection};

    fn info(name: &str, device_type: wgpu::DeviceType) -> wgpu::AdapterInfo {
        wgpu::AdapterInfo {
            name: name.into(),
            vendor: 0,
            device: 0,
            device_type,
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Vulkan,
        }
    }

    #[test]
    fn first_matches_anything() {
        let sel = AdapterSelection::First;
        assert!(selection_matches(&sel, 0, &info("llvmpipe", wgpu::DeviceType::Cpu)));
        assert!(selection_matches(&sel, 7, &info("Radeon", wgpu::DeviceType::DiscreteGpu)));
    }

    #[test]
    fn index_matches_only_that_position() {
        let sel = AdapterSelection::Index(2);
        let i = info("whatever", wgpu::DeviceType::Other);
        assert!(!selection_matches(&sel, 0, &i));
        assert!(selection_matches(&sel, 2, &i));
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let sel = AdapterSelection::Name("radeon".into());
        assert!(selection_matches(
            &sel,
            0,
            &info("AMD Radeon RX 7900", wgpu::DeviceType::DiscreteGpu)
        ));
        assert!(!selection_matches(
            &sel,
            0,
            &info("NVIDIA GeForce", wgpu::DeviceType::DiscreteGpu)
        ));
    }

    #[test]
    fn device_type_must_be_equal() {
        let sel = AdapterSelection::DeviceType(wgpu::DeviceType::Cpu);
        assert!(selection_matches(&sel, 3, &info("llvmpipe", wgpu::DeviceType::Cpu)));
        assert!(!selection_matches(
            &sel,
            0,
            &info("Intel Iris", wgpu::DeviceType::IntegratedGpu)
        ));
    }
}
