// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

/// Multiply processor - `product = left * right * factor`
///
/// `right` defaults to 1 so a single connected input is scaled by `factor`.
#[derive(Default)]
pub struct MultiplyProcessor {
    factor: Spore<f64>,
    left: Spore<f64>,
    right: Spore<f64>,
    product: Spore<f64>,
}

impl Processor for MultiplyProcessor {
    fn declare_params(params: &Tendrils) -> Result<(), TendrilError> {
        params.declare_bound(
            |p: &mut MultiplyProcessor| &mut p.factor,
            "factor",
            "constant scale applied to the product",
            1.0,
        )?;
        Ok(())
    }

    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut MultiplyProcessor| &mut p.left, "left", "", 0.0)?;
        inputs.declare_bound(|p: &mut MultiplyProcessor| &mut p.right, "right", "", 1.0)?;
        outputs.declare_bound(
            |p: &mut MultiplyProcessor| &mut p.product,
            "product",
            "left * right * factor",
            0.0,
        )?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        let product = self.left.get()? * self.right.get()? * self.factor.get()?;
        self.product.set(product)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "multiply"
    }
}

#[cfg(test)]
mod tests {
    use crate::module::Module;

    use super::*;

    #[test]
    fn scales_single_input() {
        let module = Module::new::<MultiplyProcessor>().unwrap();
        module.parameters().set("factor", 3.0).unwrap();
        module.inputs().set("left", 2.0).unwrap();
        module.process().unwrap();
        assert_eq!(module.outputs().get::<f64>("product").unwrap(), 6.0);
    }

    #[test]
    fn multiplies_both_inputs() {
        let module = Module::new::<MultiplyProcessor>().unwrap();
        module.inputs().set("left", 2.0).unwrap();
        module.inputs().set("right", 4.0).unwrap();
        module.process().unwrap();
        assert_eq!(module.outputs().get::<f64>("product").unwrap(), 8.0);
    }
}
