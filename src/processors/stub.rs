// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only processors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

pub type ExecutionLog = Arc<Mutex<Vec<String>>>;

pub fn execution_log() -> ExecutionLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &ExecutionLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Writes `in + 1` to `out` and appends its tag to a shared log
#[derive(Default)]
pub struct RecordingProcessor {
    tag: String,
    log: Option<ExecutionLog>,
    input: Spore<i64>,
    output: Spore<i64>,
}

impl RecordingProcessor {
    pub fn new(tag: &str, log: &ExecutionLog) -> Self {
        Self {
            tag: tag.to_string(),
            log: Some(log.clone()),
            ..Default::default()
        }
    }
}

impl Processor for RecordingProcessor {
    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut RecordingProcessor| &mut p.input, "in", "", 0_i64)?;
        outputs.declare_bound(|p: &mut RecordingProcessor| &mut p.output, "out", "", 0_i64)?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.tag.clone());
        }
        self.output.set(self.input.get()? + 1)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Reads `x`, writes a fixed value to `y`
#[derive(Default)]
pub struct EmitProcessor {
    pub value: i64,
    x: Spore<i64>,
    y: Spore<i64>,
}

impl EmitProcessor {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

impl Processor for EmitProcessor {
    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut EmitProcessor| &mut p.x, "x", "", 0_i64)?;
        outputs.declare_bound(|p: &mut EmitProcessor| &mut p.y, "y", "", 0_i64)?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        self.y.set(self.value)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "emit"
    }
}

/// Fails while its switch is on, otherwise copies `in` to `out`
pub struct FailingProcessor {
    failing: Arc<AtomicBool>,
    input: Spore<i64>,
    output: Spore<i64>,
}

impl FailingProcessor {
    pub fn new(failing: &Arc<AtomicBool>) -> Self {
        Self {
            failing: failing.clone(),
            input: Spore::default(),
            output: Spore::default(),
        }
    }
}

impl Processor for FailingProcessor {
    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut FailingProcessor| &mut p.input, "in", "", 0_i64)?;
        outputs.declare_bound(|p: &mut FailingProcessor| &mut p.output, "out", "", 0_i64)?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("simulated processor failure");
        }
        self.output.set(self.input.get()?)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
