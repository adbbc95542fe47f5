// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, split_endpoint, ConfigFormat, ConnectionConfig,
    ExecutionOptions, ModuleConfig, PipelineConfig,
};
pub use runtime::{Pipeline, PipelineBuilder};
pub use validation::{validate_pipeline, validate_pipeline_with};
