// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph nodes: a processor plus its three slot registries and a dirty flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

use crate::errors::PlasmError;
use crate::observability::messages::plasm::ModuleProcessed;
use crate::observability::messages::StructuredLog;
use crate::tendrils::{TendrilKind, Tendrils};
use crate::traits::Processor;
use crate::utils::sync::lock;

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(u64);

impl ModuleId {
    fn next() -> Self {
        Self(NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuild an id from its raw number, e.g. one printed by `viz`.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

pub type ModulePtr = Arc<Module>;

struct Body {
    processor: Box<dyn Processor>,
    configured: bool,
}

pub struct Module {
    id: ModuleId,
    label: String,
    type_name: &'static str,
    parameters: Tendrils,
    inputs: Tendrils,
    outputs: Tendrils,
    dirty: AtomicBool,
    body: Mutex<Body>,
}

impl Module {
    /// Build a module around a default-constructed `P`.
    pub fn new<P: Processor + Default>() -> Result<ModulePtr, PlasmError> {
        Self::from_processor(P::default())
    }

    pub fn from_processor<P: Processor>(processor: P) -> Result<ModulePtr, PlasmError> {
        let label = processor.name().to_string();
        Self::from_processor_with_label(processor, label)
    }

    /// Declare `P`'s slots, bind its spore fields, and wrap it as a graph node.
    ///
    /// New modules start dirty: they have never produced outputs.
    pub fn from_processor_with_label<P: Processor>(
        mut processor: P,
        label: impl Into<String>,
    ) -> Result<ModulePtr, PlasmError> {
        let parameters = Tendrils::new(TendrilKind::Parameter);
        let inputs = Tendrils::new(TendrilKind::Input);
        let outputs = Tendrils::new(TendrilKind::Output);

        P::declare_params(&parameters)?;
        P::declare_io(&parameters, &inputs, &outputs)?;

        parameters.realize_potential(&mut processor)?;
        inputs.realize_potential(&mut processor)?;
        outputs.realize_potential(&mut processor)?;

        Ok(Arc::new(Self {
            id: ModuleId::next(),
            label: label.into(),
            type_name: processor.name(),
            parameters,
            inputs,
            outputs,
            dirty: AtomicBool::new(true),
            body: Mutex::new(Body {
                processor: Box::new(processor),
                configured: false,
            }),
        }))
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The processor's name, shared by every module of the same kind.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn parameters(&self) -> &Tendrils {
        &self.parameters
    }

    pub fn inputs(&self) -> &Tendrils {
        &self.inputs
    }

    pub fn outputs(&self) -> &Tendrils {
        &self.outputs
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub(crate) fn set_dirty(&self, dirty: bool) {
        self.dirty.store(dirty, Ordering::Release);
    }

    /// Run the processor once, configuring it first if it never ran.
    ///
    /// Does not touch the dirty flag; the graph decides that.
    pub(crate) fn process(&self) -> Result<(), PlasmError> {
        let mut body = lock(&self.body);
        if !body.configured {
            body.processor
                .configure(&self.parameters, &self.inputs, &self.outputs)
                .map_err(|source| PlasmError::ConfigureFailed {
                    module: self.id,
                    source,
                })?;
            body.configured = true;
        }

        let started = Instant::now();
        body.processor
            .process(&self.inputs, &self.outputs)
            .map_err(|source| PlasmError::ProcessFailed {
                module: self.id,
                source,
            })?;
        ModuleProcessed {
            module: self.id,
            label: &self.label,
            duration: started.elapsed(),
        }
        .log();
        Ok(())
    }

    /// reStructuredText description of all three registries.
    pub fn print_doc<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{}", self.label)?;
        writeln!(out, "{}", "=".repeat(self.label.len()))?;
        writeln!(out)?;
        self.parameters.print_doc(out, "Parameters")?;
        self.inputs.print_doc(out, "Inputs")?;
        self.outputs.print_doc(out, "Outputs")
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("type", &self.type_name)
            .field("dirty", &self.is_dirty())
            .field("parameters", &self.parameters)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}
