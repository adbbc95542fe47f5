// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::consts::{DEFAULT_ITERATIONS, ENDPOINT_SEPARATOR, MAX_ITERATIONS};
use crate::config::validate_pipeline;
use crate::errors::ConfigError;

/// A pipeline description: modules, the connections between their slots, and
/// how to run the result.
///
/// # Example
/// ```yaml
/// modules:
///   - id: two
///     type: constant
///     params:
///       value: 2
///   - id: show
///     type: printer
///     params:
///       prefix: "result: "
/// connections:
///   - from: two.out
///     to: show.in
/// execution:
///   start: show
///   iterations: 1
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub modules: Vec<ModuleConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    #[serde(default)]
    pub execution: ExecutionOptions,
}

/// One graph node: a unique id, the factory type to build, and parameter values.
///
/// Parameter values are applied through the module's parameter tendrils, so each
/// one must decode into the type the module declared for it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub module_type: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// An edge written as `module.output` -> `module.input`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    pub from: String,
    pub to: String,
}

impl ConnectionConfig {
    pub fn source(&self) -> Option<(&str, &str)> {
        split_endpoint(&self.from)
    }

    pub fn target(&self) -> Option<(&str, &str)> {
        split_endpoint(&self.to)
    }
}

/// Split `module.slot` at the first separator. Both halves must be non-empty.
pub fn split_endpoint(endpoint: &str) -> Option<(&str, &str)> {
    let (module, slot) = endpoint.split_once(ENDPOINT_SEPARATOR)?;
    if module.is_empty() || slot.is_empty() {
        None
    } else {
        Some((module, slot))
    }
}

/// How `run` drives the built graph.
///
/// * `start` - module whose upstream closure is executed; the whole graph when absent
/// * `iterations` - how many times to execute, marking every module dirty in between
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExecutionOptions {
    pub start: Option<String>,
    pub iterations: Option<usize>,
}

impl ExecutionOptions {
    /// Iteration count, defaulted and clamped to `1..=MAX_ITERATIONS`.
    pub fn get_iterations(&self) -> usize {
        self.iterations
            .unwrap_or(DEFAULT_ITERATIONS)
            .clamp(1, MAX_ITERATIONS)
    }
}

/// Pipeline file syntax, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(extension)),
        }
    }
}

impl PipelineConfig {
    /// Parse a description held in memory.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        Ok(match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        })
    }
}

/// Load a pipeline description from a `.yaml`, `.yml` or `.toml` file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    PipelineConfig::parse(&content, format)
}

/// Load a pipeline description and check it against the built-in module types.
///
/// All validation problems are reported together in [`ConfigError::Invalid`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate_pipeline(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
