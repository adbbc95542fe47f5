// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::io;

use crate::config::{validate_pipeline_with, PipelineConfig};
use crate::engine::{ExecutionSummary, Plasm};
use crate::errors::{ConfigError, PlasmError, ValidationError};
use crate::module::{ModuleId, ModulePtr};
use crate::processors::ModuleFactory;

/// Pipeline builder - turns a validated description into a connected graph.
///
/// Modules are created through the [`ModuleFactory`], parameters from the
/// description are decoded into each module's parameter slots, then the
/// connections are made in the order written.
///
/// ```
/// use plasmflow::config::{ConfigFormat, PipelineBuilder, PipelineConfig};
///
/// let cfg = PipelineConfig::parse(r#"
/// modules:
///   - {id: two, type: constant, params: {value: 2}}
///   - {id: double, type: multiply, params: {factor: 2}}
/// connections:
///   - {from: two.out, to: double.left}
/// "#, ConfigFormat::Yaml).unwrap();
///
/// let pipeline = PipelineBuilder::new().build(&cfg).unwrap();
/// pipeline.run().unwrap();
///
/// let double = pipeline.module("double").unwrap();
/// assert_eq!(double.outputs().get::<f64>("product").unwrap(), 4.0);
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    factory: ModuleFactory,
}

impl PipelineBuilder {
    /// A builder for the built-in module types.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(factory: ModuleFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ModuleFactory {
        &self.factory
    }

    pub fn build(&self, cfg: &PipelineConfig) -> Result<Pipeline, ConfigError> {
        validate_pipeline_with(cfg, &self.factory).map_err(ConfigError::Invalid)?;

        let mut plasm = Plasm::new();
        let mut modules = BTreeMap::new();
        for module_cfg in &cfg.modules {
            let module = self
                .factory
                .create(&module_cfg.module_type, &module_cfg.id)
                .ok_or_else(|| {
                    ConfigError::Invalid(vec![ValidationError::UnknownModuleType {
                        module_id: module_cfg.id.clone(),
                        module_type: module_cfg.module_type.clone(),
                    }])
                })??;

            for (param, value) in &module_cfg.params {
                module
                    .parameters()
                    .at(param)
                    .and_then(|tendril| tendril.set_json(value.clone()))
                    .map_err(|source| ConfigError::Parameter {
                        module_id: module_cfg.id.clone(),
                        param: param.clone(),
                        source,
                    })?;
            }

            plasm.insert(module.clone());
            modules.insert(module_cfg.id.clone(), module);
        }

        for connection in &cfg.connections {
            let (from, output) = resolve(&modules, &connection.from)?;
            let (to, input) = resolve(&modules, &connection.to)?;
            plasm.connect(from, output, to, input)?;
        }

        let start = match &cfg.execution.start {
            Some(id) => Some(lookup(&modules, id, id)?.id()),
            None => None,
        };

        Ok(Pipeline {
            plasm,
            modules,
            start,
            iterations: cfg.execution.get_iterations(),
        })
    }
}

fn resolve<'m, 'e>(
    modules: &'m BTreeMap<String, ModulePtr>,
    endpoint: &'e str,
) -> Result<(&'m ModulePtr, &'e str), ConfigError> {
    let (module_id, slot) = super::split_endpoint(endpoint).ok_or_else(|| {
        ConfigError::Invalid(vec![ValidationError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
        }])
    })?;
    Ok((lookup(modules, module_id, endpoint)?, slot))
}

fn lookup<'m>(
    modules: &'m BTreeMap<String, ModulePtr>,
    module_id: &str,
    endpoint: &str,
) -> Result<&'m ModulePtr, ConfigError> {
    modules.get(module_id).ok_or_else(|| {
        ConfigError::Invalid(vec![ValidationError::UnresolvedModule {
            endpoint: endpoint.to_string(),
            missing_module: module_id.to_string(),
        }])
    })
}

/// A built graph plus the ids the description used for its modules.
pub struct Pipeline {
    plasm: Plasm,
    modules: BTreeMap<String, ModulePtr>,
    start: Option<ModuleId>,
    iterations: usize,
}

impl Pipeline {
    pub fn plasm(&self) -> &Plasm {
        &self.plasm
    }

    pub fn module(&self, id: &str) -> Option<&ModulePtr> {
        self.modules.get(id)
    }

    /// Description id -> module, sorted by id.
    pub fn modules(&self) -> &BTreeMap<String, ModulePtr> {
        &self.modules
    }

    pub fn start(&self) -> Option<ModuleId> {
        self.start
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Hand the graph and the id map to the caller for further editing.
    pub fn into_parts(self) -> (Plasm, BTreeMap<String, ModulePtr>) {
        (self.plasm, self.modules)
    }

    /// Execute the configured number of iterations.
    ///
    /// Every iteration after the first marks all modules dirty again, so stateful
    /// modules see one `process` call per iteration.
    pub fn run(&self) -> Result<Vec<ExecutionSummary>, PlasmError> {
        let mut summaries = Vec::with_capacity(self.iterations);
        for iteration in 0..self.iterations {
            if iteration > 0 {
                for module in self.modules.values() {
                    self.plasm.mark_dirty(module.id())?;
                }
            }
            let summary = match self.start {
                Some(start) => self.plasm.go(start)?,
                None => self.plasm.go_all()?,
            };
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// One `module.output = value` line per output slot, in id order.
    pub fn write_outputs<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, module) in &self.modules {
            for (name, tendril) in module.outputs().iter() {
                match tendril.to_json() {
                    Ok((_, value)) => writeln!(out, "{id}.{name} = {value}")?,
                    Err(_) => writeln!(out, "{id}.{name} = <{}>", tendril.type_name())?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::errors::TendrilError;

    fn parse(yaml: &str) -> PipelineConfig {
        PipelineConfig::parse(yaml, ConfigFormat::Yaml).unwrap()
    }

    #[test]
    fn builds_and_runs_with_params() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: constant, params: {value: 1.5}}
  - {id: b, type: constant, params: {value: 2}}
  - {id: sum, type: add}
  - {id: show, type: printer, params: {prefix: "sum="}}
connections:
  - {from: a.out, to: sum.left}
  - {from: b.out, to: sum.right}
  - {from: sum.sum, to: show.in}
"#,
        );
        let pipeline = PipelineBuilder::new().build(&cfg).unwrap();
        assert_eq!(pipeline.plasm().len(), 4);
        assert_eq!(pipeline.plasm().edges().len(), 3);

        let summaries = pipeline.run().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].executed.len(), 4);

        let show = pipeline.module("show").unwrap();
        assert_eq!(show.outputs().get::<String>("line").unwrap(), "sum=3.5");
    }

    #[test]
    fn iterations_rerun_stateful_modules() {
        let cfg = parse(
            r#"
modules:
  - {id: one, type: constant, params: {value: 1}}
  - {id: acc, type: accumulate}
connections:
  - {from: one.out, to: acc.in}
execution: {start: acc, iterations: 3}
"#,
        );
        let pipeline = PipelineBuilder::new().build(&cfg).unwrap();
        assert_eq!(pipeline.start(), Some(pipeline.module("acc").unwrap().id()));

        pipeline.run().unwrap();

        let acc = pipeline.module("acc").unwrap();
        assert_eq!(acc.outputs().get::<f64>("total").unwrap(), 3.0);
    }

    #[test]
    fn start_limits_execution() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: constant}
  - {id: b, type: constant}
execution: {start: a}
"#,
        );
        let pipeline = PipelineBuilder::new().build(&cfg).unwrap();
        let summaries = pipeline.run().unwrap();
        assert_eq!(summaries[0].executed, vec![pipeline.module("a").unwrap().id()]);
        assert!(pipeline.module("b").unwrap().is_dirty());
    }

    #[test]
    fn unknown_parameter_is_reported() {
        let cfg = parse("modules: [{id: a, type: constant, params: {colour: 1}}]");
        let err = PipelineBuilder::new().build(&cfg).err().unwrap();
        match err {
            ConfigError::Parameter {
                module_id,
                param,
                source,
            } => {
                assert_eq!(module_id, "a");
                assert_eq!(param, "colour");
                assert!(matches!(source, TendrilError::KeyNotFound { .. }));
            }
            other => panic!("expected Parameter error, got {other:?}"),
        }
    }

    #[test]
    fn wrongly_typed_parameter_is_reported() {
        let cfg = parse("modules: [{id: a, type: constant, params: {value: \"lots\"}}]");
        let err = PipelineBuilder::new().build(&cfg).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::Parameter {
                source: TendrilError::ValueConversion { .. },
                ..
            }
        ));
    }

    #[test]
    fn slot_type_mismatch_surfaces_as_plasm_error() {
        let cfg = parse(
            r#"
modules:
  - {id: p, type: printer}
  - {id: q, type: printer}
connections:
  - {from: p.line, to: q.in}
"#,
        );
        let err = PipelineBuilder::new().build(&cfg).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::Plasm(PlasmError::ConnectionTypeError { .. })
        ));
    }

    #[test]
    fn invalid_description_is_rejected_before_building() {
        let cfg = parse("modules: [{id: a, type: nope}]");
        let err = PipelineBuilder::new().build(&cfg).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid(ref errors) if errors.len() == 1));
    }

    #[test]
    fn writes_every_output() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: constant, params: {value: 4}}
  - {id: show, type: printer}
connections:
  - {from: a.out, to: show.in}
"#,
        );
        let pipeline = PipelineBuilder::new().build(&cfg).unwrap();
        pipeline.run().unwrap();

        let mut buffer = Vec::new();
        pipeline.write_outputs(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "a.out = 4.0\nshow.line = \"4\"\n");
    }
}
