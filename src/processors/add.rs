// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

/// Add processor - `sum = left + right`
#[derive(Default)]
pub struct AddProcessor {
    left: Spore<f64>,
    right: Spore<f64>,
    sum: Spore<f64>,
}

impl Processor for AddProcessor {
    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut AddProcessor| &mut p.left, "left", "first addend", 0.0)?;
        inputs.declare_bound(|p: &mut AddProcessor| &mut p.right, "right", "second addend", 0.0)?;
        outputs.declare_bound(|p: &mut AddProcessor| &mut p.sum, "sum", "left + right", 0.0)?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        self.sum.set(self.left.get()? + self.right.get()?)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add"
    }
}

#[cfg(test)]
mod tests {
    use crate::module::Module;

    use super::*;

    #[test]
    fn adds_inputs() {
        let module = Module::new::<AddProcessor>().unwrap();
        module.inputs().set("left", 1.5).unwrap();
        module.inputs().set("right", 2.0).unwrap();
        module.process().unwrap();
        assert_eq!(module.outputs().get::<f64>("sum").unwrap(), 3.5);
    }

    #[test]
    fn wrong_input_type_is_rejected() {
        let module = Module::new::<AddProcessor>().unwrap();
        let err = module.inputs().set("left", 1_i64).unwrap_err();
        assert!(err.is_type_mismatch());
    }
}
