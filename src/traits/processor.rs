// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TendrilError;
use crate::tendrils::Tendrils;

/// Business logic of a module.
///
/// Slot declaration is static: a processor type declares its parameters,
/// inputs and outputs before any instance exists, usually through
/// [`Tendrils::declare_bound`] so the slots show up as `Spore` fields once the
/// instance is realized. `configure` runs once, right before the first
/// `process`, so parameters set after construction are visible to it.
///
/// ```
/// use plasmflow::tendrils::{Spore, Tendrils};
/// use plasmflow::traits::Processor;
/// use plasmflow::errors::TendrilError;
///
/// #[derive(Default)]
/// struct Double {
///     input: Spore<i64>,
///     output: Spore<i64>,
/// }
///
/// impl Processor for Double {
///     fn declare_io(_: &Tendrils, inputs: &Tendrils, outputs: &Tendrils) -> Result<(), TendrilError> {
///         inputs.declare_bound(|d: &mut Double| &mut d.input, "in", "value to double", 0)?;
///         outputs.declare_bound(|d: &mut Double| &mut d.output, "out", "twice the input", 0)?;
///         Ok(())
///     }
///
///     fn process(&mut self, _: &Tendrils, _: &Tendrils) -> anyhow::Result<()> {
///         self.output.set(self.input.get()? * 2)?;
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "double"
///     }
/// }
/// ```
pub trait Processor: Send + 'static {
    fn declare_params(_params: &Tendrils) -> Result<(), TendrilError>
    where
        Self: Sized,
    {
        Ok(())
    }

    fn declare_io(
        _params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> Result<(), TendrilError>
    where
        Self: Sized,
    {
        Ok(())
    }

    fn configure(
        &mut self,
        _params: &Tendrils,
        _inputs: &Tendrils,
        _outputs: &Tendrils,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn process(&mut self, inputs: &Tendrils, outputs: &Tendrils) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}
