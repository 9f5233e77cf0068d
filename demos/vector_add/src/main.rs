// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector add demo.
//!
//! Adds two `i32` vectors on a compute device and prints the result. With no
//! arguments it runs the classic demonstration payload; `--len` switches to
//! generated ramps, and the adapter flags pin a specific device.

use anyhow::{bail, Result};
use clap::Parser;
use vecadd::util::{AdapterSelection, GpuContext};
use vecadd::{wgpu, VecAdd};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    pollster::block_on(run(&args))
}

async fn run(args: &Args) -> Result<()> {
    let mut context = GpuContext::new();
    if args.list_adapters {
        let adapters = context.adapters();
        if adapters.is_empty() {
            bail!("no adapters available on any backend");
        }
        println!("Available adapters:");
        for (idx, adapter) in adapters.iter().enumerate() {
            let info = adapter.get_info();
            println!(
                "{idx}: {} ({:?}, {:?} backend)",
                info.name, info.device_type, info.backend
            );
        }
        return Ok(());
    }

    let dev_id = context.device(&args.selection()).await?;
    let handle = &context.devices[dev_id];
    let info = handle.adapter().get_info();
    println!("Using adapter: {} ({:?} backend)", info.name, info.backend);

    let (a, b) = match args.len {
        Some(n) => (
            (0..n as i32).collect::<Vec<_>>(),
            (0..n as i32).map(|i| i * 10).collect::<Vec<_>>(),
        ),
        None => (vec![1, 2, 3, 4], vec![10, 20, 30, 40]),
    };

    let runner = VecAdd::new(&handle.device).await?;
    let result = runner.run(&handle.device, &handle.queue, &a, &b).await?;

    let rendered = result
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("result: {rendered}");
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name = "cargo run -p vecadd_demo --")]
struct Args {
    /// Select the adapter at this enumeration index
    #[arg(long, conflicts_with_all = ["adapter_name", "device_type"])]
    adapter_index: Option<usize>,
    /// Select an adapter whose name contains this string (case-insensitive)
    #[arg(long, conflicts_with = "device_type")]
    adapter_name: Option<String>,
    /// Select an adapter of this device type
    #[arg(long, value_enum)]
    device_type: Option<DeviceTypeArg>,
    /// Display a list of all available adapters
    #[arg(long)]
    list_adapters: bool,
    /// Generate inputs of this length instead of the built-in demonstration data
    #[arg(long, short)]
    len: Option<u32>,
}

impl Args {
    fn selection(&self) -> AdapterSelection {
        if let Some(index) = self.adapter_index {
            AdapterSelection::Index(index)
        } else if let Some(name) = &self.adapter_name {
            AdapterSelection::Name(name.clone())
        } else if let Some(device_type) = self.device_type {
            AdapterSelection::DeviceType(device_type.into())
        } else {
            AdapterSelection::First
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DeviceTypeArg {
    Discrete,
    Integrated,
    Virtual,
    Cpu,
    Other,
}

impl From<DeviceTypeArg> for wgpu::DeviceType {
    fn from(value: DeviceTypeArg) -> Self {
        match value {
            DeviceTypeArg::Discrete => Self::DiscreteGpu,
            DeviceTypeArg::Integrated => Self::IntegratedGpu,
            DeviceTypeArg::Virtual => Self::VirtualGpu,
            DeviceTypeArg::Cpu => Self::Cpu,
            DeviceTypeArg::Other => Self::Other,
        }
    }
}
