// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::{Spore, Tendrils};
use crate::traits::Processor;

/// Printer processor - writes `<prefix><in>` to stdout and to its `line` output
#[derive(Default)]
pub struct PrinterProcessor {
    prefix: Spore<String>,
    input: Spore<f64>,
    line: Spore<String>,
}

impl Processor for PrinterProcessor {
    fn declare_params(params: &Tendrils) -> Result<(), TendrilError> {
        params.declare_bound(
            |p: &mut PrinterProcessor| &mut p.prefix,
            "prefix",
            "text printed before the value",
            String::new(),
        )?;
        Ok(())
    }

    fn declare_io(
        _params: &Tendrils,
        inputs: &Tendrils,
        outputs: &Tendrils,
    ) -> Result<(), TendrilError> {
        inputs.declare_bound(|p: &mut PrinterProcessor| &mut p.input, "in", "value to print", 0.0)?;
        outputs.declare_bound(
            |p: &mut PrinterProcessor| &mut p.line,
            "line",
            "the last line printed",
            String::new(),
        )?;
        Ok(())
    }

    fn process(&mut self, _inputs: &Tendrils, _outputs: &Tendrils) -> anyhow::Result<()> {
        let line = format!("{}{}", self.prefix.get()?, self.input.get()?);
        println!("{line}");
        self.line.set(line)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "printer"
    }
}

#[cfg(test)]
mod tests {
    use crate::module::Module;

    use super::*;

    #[test]
    fn formats_with_prefix() {
        let module = Module::new::<PrinterProcessor>().unwrap();
        module
            .parameters()
            .set("prefix", "total = ".to_string())
            .unwrap();
        module.inputs().set("in", 4.5).unwrap();
        module.process().unwrap();
        assert_eq!(
            module.outputs().get::<String>("line").unwrap(),
            "total = 4.5"
        );
    }
}
