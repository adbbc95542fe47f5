// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

/// Constant processor - copies its `value` parameter to the `out` output
#[derive(Default)]
pub struct ConstantProcessor {
    value: Spore<f64>,
    out: Spore<f64>,
}

impl Processor for ConstantProcessor {
    fn declare_params(params: &Tendrils) -> Result<(), TendrilError> {
        params.declare_bound(
            |p: &mut ConstantProcessor| &mut p.value,
            "value",
            "value to emit",
            0.0,
        )?;
        Ok(())
    }

    fn declare_io(
        _params: &Tendrils,
        _inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        outputs.declare_bound(
            |p: &mut ConstantProcessor| &mut p.out,
            "out",
            "the configured value",
            0.0,
        )?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        self.out.set(self.value.get()?)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
