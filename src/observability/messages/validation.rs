// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline description validation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic connection detected in a pipeline description.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use plasmflow::observability::messages::validation::CyclicConnectionDetected;
///
/// let cycle = vec!["a", "b", "a"];
/// let msg = CyclicConnectionDetected {
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicConnectionDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicConnectionDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic connection detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicConnectionDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// Pipeline validation started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationStarted {
    pub module_count: usize,
    pub connection_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline validation for {} modules and {} connections",
            self.module_count, self.connection_count
        )
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::info!(
            module_count = self.module_count,
            connection_count = self.connection_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            module_count = self.module_count,
            connection_count = self.connection_count,
        )
    }
}

/// Pipeline validation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationCompleted {
    pub module_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline validation completed successfully for {} modules",
            self.module_count
        )
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::info!(module_count = self.module_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            module_count = self.module_count,
        )
    }
}

/// Pipeline validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            error_count = self.error_count,
        )
    }
}
