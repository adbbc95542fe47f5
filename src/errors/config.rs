// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

/// Errors that can occur during pipeline description validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Connections between modules form a cycle
    CyclicConnection {
        /// The cycle path, first module repeated at the end
        cycle: Vec<String>,
    },
    /// A connection references a module id that doesn't exist
    UnresolvedModule {
        /// The endpoint as written, e.g. `adder.sum`
        endpoint: String,
        /// The module id that couldn't be resolved
        missing_module: String,
    },
    /// Two modules share an id
    DuplicateModuleId {
        module_id: String,
    },
    /// A module names a type the factory cannot build
    UnknownModuleType {
        module_id: String,
        module_type: String,
    },
    /// An endpoint isn't of the form `module.slot`
    MalformedEndpoint {
        endpoint: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicConnection { cycle } => {
                write!(f, "Cyclic connection detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedModule {
                endpoint,
                missing_module,
            } => {
                write!(
                    f,
                    "Endpoint '{}' refers to module '{}' which does not exist",
                    endpoint, missing_module
                )
            }
            ValidationError::DuplicateModuleId { module_id } => {
                write!(f, "Duplicate module ID: '{}'", module_id)
            }
            ValidationError::UnknownModuleType {
                module_id,
                module_type,
            } => {
                write!(
                    f,
                    "Module '{}' has unknown type '{}'",
                    module_id, module_type
                )
            }
            ValidationError::MalformedEndpoint { endpoint } => {
                write!(
                    f,
                    "Endpoint '{}' must be written as '<module>.<slot>'",
                    endpoint
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors loading or instantiating a pipeline description
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML pipeline: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse TOML pipeline: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported pipeline file extension '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Pipeline validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("parameter '{param}' of module '{module_id}': {source}")]
    Parameter {
        module_id: String,
        param: String,
        #[source]
        source: crate::errors::TendrilError,
    },

    #[error(transparent)]
    Plasm(#[from] crate::errors::PlasmError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
