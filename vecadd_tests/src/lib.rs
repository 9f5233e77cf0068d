// Copyright 2025 the Vecadd Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vecadd test harness.

#![warn(unused_crate_dependencies)]

use anyhow::{anyhow, Result};
use vecadd::util::{AdapterSelection, GpuContext};
use vecadd::VecAdd;

/// One-shot addition through the public entry point, blocking on the result.
pub fn add_sync(a: &[i32], b: &[i32]) -> Result<Vec<i32>, vecadd::Error> {
    pollster::block_on(vecadd::add_i32(a, b))
}

/// A context, device and runner kept alive across several runs, so tests can
/// exercise kernel reuse and determinism without recompiling per call.
pub struct Session {
    context: GpuContext,
    dev_id: usize,
    runner: VecAdd,
}

impl Session {
    pub fn new() -> Result<Self> {
        Self::with_selection(&AdapterSelection::First)
    }

    pub fn with_selection(selection: &AdapterSelection) -> Result<Self> {
        pollster::block_on(async {
            let mut context = GpuContext::new();
            let dev_id = context.device(selection).await?;
            let handle = &context.devices[dev_id];
            let runner = VecAdd::new(&handle.device).await?;
            Ok(Self {
                context,
                dev_id,
                runner,
            })
        })
    }

    pub fn run(&self, a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
        let handle = self
            .context
            .devices
            .get(self.dev_id)
            .ok_or_else(|| anyhow!("device handle disappeared"))?;
        Ok(pollster::block_on(self.runner.run(
            &handle.device,
            &handle.queue,
            a,
            b,
        ))?)
    }
}
