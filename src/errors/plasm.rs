// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for graph construction and execution.

use thiserror::Error;

use crate::errors::TendrilError;
use crate::module::ModuleId;

#[derive(Debug, Error)]
pub enum PlasmError {
    #[error(transparent)]
    Tendril(#[from] TendrilError),

    #[error("module {module} is not part of this plasm")]
    ModuleNotFound { module: ModuleId },

    /// Output and input slots hold different types.
    #[error(
        "cannot connect {from}.{output} ({output_type}) to {to}.{input} ({input_type}): types differ"
    )]
    ConnectionTypeError {
        from: ModuleId,
        output: String,
        to: ModuleId,
        input: String,
        output_type: &'static str,
        input_type: &'static str,
    },

    #[error("input '{input}' of module {module} is already connected")]
    InputAlreadyConnected { module: ModuleId, input: String },

    #[error("no connection {from}.{output} -> {to}.{input}")]
    NotConnected {
        from: ModuleId,
        output: String,
        to: ModuleId,
        input: String,
    },

    /// Execution was requested over a scope that contains a dependency cycle.
    #[error("cyclic graph: {}", format_cycle(.cycle))]
    CyclicGraph { cycle: Vec<ModuleId> },

    #[error("module {module} failed to process: {source}")]
    ProcessFailed {
        module: ModuleId,
        #[source]
        source: anyhow::Error,
    },

    #[error("module {module} failed to configure: {source}")]
    ConfigureFailed {
        module: ModuleId,
        #[source]
        source: anyhow::Error,
    },
}

fn format_cycle(cycle: &[ModuleId]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
