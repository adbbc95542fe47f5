// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

/// Accumulate processor - adds its input to a running total on every run
///
/// The total starts at the `initial` parameter, read once when the processor
/// is configured.
#[derive(Default)]
pub struct AccumulateProcessor {
    initial: Spore<f64>,
    input: Spore<f64>,
    total: Spore<f64>,
    running: f64,
}

impl Processor for AccumulateProcessor {
    fn declare_params(params: &Tendrils) -> Result<(), TendrilError> {
        params.declare_bound(
            |p: &mut AccumulateProcessor| &mut p.initial,
            "initial",
            "starting total",
            0.0,
        )?;
        Ok(())
    }

    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut AccumulateProcessor| &mut p.input, "in", "amount to add", 0.0)?;
        outputs.declare_bound(
            |p: &mut AccumulateProcessor| &mut p.total,
            "total",
            "sum of every input seen so far",
            0.0,
        )?;
        Ok(())
    }

    fn configure(
        &mut self,
        _params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> anyhow::Result<()> {
        self.running = self.initial.get()?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        self.running += self.input.get()?;
        self.total.set(self.running)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "accumulate"
    }
}

#[cfg(test)]
mod tests {
    use crate::module::Module;

    use super::*;

    #[test]
    fn keeps_running_total_from_initial() {
        let module = Module::new::<AccumulateProcessor>().unwrap();
        module.parameters().set("initial", 10.0).unwrap();
        module.inputs().set("in", 2.0).unwrap();

        module.process().unwrap();
        module.process().unwrap();
        module.process().unwrap();

        assert_eq!(module.outputs().get::<f64>("total").unwrap(), 16.0);
    }

    #[test]
    fn initial_is_only_read_once() {
        let module = Module::new::<AccumulateProcessor>().unwrap();
        module.inputs().set("in", 1.0).unwrap();
        module.process().unwrap();

        module.parameters().set("initial", 100.0).unwrap();
        module.process().unwrap();

        assert_eq!(module.outputs().get::<f64>("total").unwrap(), 2.0);
    }
}
