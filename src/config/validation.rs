// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation of pipeline descriptions before any module is built.
//!
//! Checks run in order, accumulating errors so a user sees every problem at once:
//!
//! 1. **Uniqueness**: module ids are unique
//! 2. **Module types**: every `type` is known to the factory
//! 3. **Endpoints**: every connection end is `module.slot` and names a declared module;
//!    so does `execution.start`
//! 4. **Cycles**: the module graph implied by the connections is acyclic
//!
//! Cycle detection needs a structurally sound graph, so it is skipped while
//! any earlier check fails. Slot names and slot types are not checked here;
//! they are only known once modules exist, and `Plasm::connect` rejects them.
//!
//! ```
//! use plasmflow::config::{validate_pipeline, ConfigFormat, PipelineConfig};
//! use plasmflow::errors::ValidationError;
//!
//! let cfg = PipelineConfig::parse(
//!     "modules: [{id: a, type: constant}, {id: a, type: printer}]",
//!     ConfigFormat::Yaml,
//! ).unwrap();
//!
//! let errors = validate_pipeline(&cfg).unwrap_err();
//! assert_eq!(errors, vec![ValidationError::DuplicateModuleId { module_id: "a".into() }]);
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::config::PipelineConfig;
use crate::engine::find_cycle;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicConnectionDetected, ValidationCompleted, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use crate::processors::ModuleFactory;

/// Validate against the built-in module types.
pub fn validate_pipeline(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    validate_pipeline_with(config, &ModuleFactory::default())
}

/// Validate against the module types `factory` can build.
pub fn validate_pipeline_with(
    config: &PipelineConfig,
    factory: &ModuleFactory,
) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        module_count: config.modules.len(),
        connection_count: config.connections.len(),
    }
    .log();

    let mut errors = Vec::new();
    errors.extend(validate_unique_module_ids(config));
    errors.extend(validate_module_types(config, factory));
    errors.extend(validate_endpoints(config));

    if errors.is_empty() {
        errors.extend(validate_acyclic(config));
    }

    if errors.is_empty() {
        ValidationCompleted {
            module_count: config.modules.len(),
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_unique_module_ids(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    config
        .modules
        .iter()
        .filter(|module| !seen.insert(module.id.as_str()))
        .map(|module| ValidationError::DuplicateModuleId {
            module_id: module.id.clone(),
        })
        .collect()
}

fn validate_module_types(config: &PipelineConfig, factory: &ModuleFactory) -> Vec<ValidationError> {
    config
        .modules
        .iter()
        .filter(|module| !factory.is_available(&module.module_type))
        .map(|module| ValidationError::UnknownModuleType {
            module_id: module.id.clone(),
            module_type: module.module_type.clone(),
        })
        .collect()
}

fn validate_endpoints(config: &PipelineConfig) -> Vec<ValidationError> {
    let ids: HashSet<&str> = config.modules.iter().map(|m| m.id.as_str()).collect();
    let mut errors = Vec::new();

    let endpoints = config
        .connections
        .iter()
        .flat_map(|c| [c.from.as_str(), c.to.as_str()]);
    for endpoint in endpoints {
        match super::split_endpoint(endpoint) {
            None => errors.push(ValidationError::MalformedEndpoint {
                endpoint: endpoint.to_string(),
            }),
            Some((module, _)) if !ids.contains(module) => {
                errors.push(ValidationError::UnresolvedModule {
                    endpoint: endpoint.to_string(),
                    missing_module: module.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if let Some(start) = &config.execution.start {
        if !ids.contains(start.as_str()) {
            errors.push(ValidationError::UnresolvedModule {
                endpoint: start.clone(),
                missing_module: start.clone(),
            });
        }
    }
    errors
}

/// Only called once every endpoint is known to be well-formed and resolved.
fn validate_acyclic(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = config
        .modules
        .iter()
        .map(|m| (m.id.as_str(), Vec::new()))
        .collect();
    for connection in &config.connections {
        if let (Some((from, _)), Some((to, _))) = (connection.source(), connection.target()) {
            adjacency.entry(from).or_default().push(to);
        }
    }

    match find_cycle(&adjacency) {
        Some(cycle) => {
            CyclicConnectionDetected { cycle: &cycle }.log();
            vec![ValidationError::CyclicConnection {
                cycle: cycle.into_iter().map(str::to_string).collect(),
            }]
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFormat, PipelineConfig};

    fn parse(yaml: &str) -> PipelineConfig {
        PipelineConfig::parse(yaml, ConfigFormat::Yaml).unwrap()
    }

    #[test]
    fn valid_chain() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: constant}
  - {id: b, type: multiply}
  - {id: c, type: printer}
connections:
  - {from: a.out, to: b.left}
  - {from: b.product, to: c.in}
execution: {start: c}
"#,
        );
        assert!(validate_pipeline(&cfg).is_ok());
    }

    #[test]
    fn unknown_module_type() {
        let cfg = parse("modules: [{id: a, type: divide}]");
        assert_eq!(
            validate_pipeline(&cfg).unwrap_err(),
            vec![ValidationError::UnknownModuleType {
                module_id: "a".into(),
                module_type: "divide".into(),
            }]
        );
    }

    #[test]
    fn custom_factory_types_are_accepted() {
        let cfg = parse("modules: [{id: r, type: recorder}]");
        assert!(validate_pipeline(&cfg).is_err());

        let mut factory = ModuleFactory::default();
        factory.register::<crate::processors::stub::RecordingProcessor>("recorder");
        assert!(validate_pipeline_with(&cfg, &factory).is_ok());
    }

    #[test]
    fn malformed_and_unresolved_endpoints_accumulate() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: constant}
connections:
  - {from: a, to: ghost.in}
execution: {start: nobody}
"#,
        );
        let errors = validate_pipeline(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MalformedEndpoint {
                    endpoint: "a".into()
                },
                ValidationError::UnresolvedModule {
                    endpoint: "ghost.in".into(),
                    missing_module: "ghost".into(),
                },
                ValidationError::UnresolvedModule {
                    endpoint: "nobody".into(),
                    missing_module: "nobody".into(),
                },
            ]
        );
    }

    #[test]
    fn cycle_path_is_reported() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: add}
  - {id: b, type: add}
  - {id: c, type: add}
connections:
  - {from: a.sum, to: b.left}
  - {from: b.sum, to: c.left}
  - {from: c.sum, to: a.left}
"#,
        );
        let errors = validate_pipeline(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicConnection {
                cycle: vec!["a".into(), "b".into(), "c".into(), "a".into()],
            }]
        );
        assert_eq!(
            errors[0].to_string(),
            "Cyclic connection detected: a -> b -> c -> a"
        );
    }

    #[test]
    fn cycle_check_waits_for_clean_structure() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: add}
  - {id: a, type: add}
connections:
  - {from: a.sum, to: a.left}
"#,
        );
        let errors = validate_pipeline(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::DuplicateModuleId { .. }));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let cfg = parse(
            r#"
modules:
  - {id: a, type: add}
connections:
  - {from: a.sum, to: a.left}
"#,
        );
        let errors = validate_pipeline(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicConnection {
                cycle: vec!["a".into(), "a".into()],
            }]
        );
    }
}
