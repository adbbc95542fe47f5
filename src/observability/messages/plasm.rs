// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph edits and execution events.
//!
//! This module contains message types for logging events related to:
//! * Connecting, disconnecting and removing modules
//! * Dirty propagation
//! * Execution lifecycle (start, per-module runs, completion, failure)
//! * Cycle detection

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::module::ModuleId;
use crate::observability::messages::StructuredLog;

/// An output slot was connected to an input slot.
///
/// # Log Level
/// `info!` - Structural change to the graph
///
/// # Example
/// ```
/// use plasmflow::module::ModuleId;
/// use plasmflow::observability::messages::plasm::ModulesConnected;
///
/// let msg = ModulesConnected {
///     from: ModuleId::from_raw(1),
///     output: "sum",
///     to: ModuleId::from_raw(2),
///     input: "in",
/// };
///
/// assert_eq!(msg.to_string(), "Connected module#1.sum -> module#2.in");
/// ```
pub struct ModulesConnected<'a> {
    pub from: ModuleId,
    pub output: &'a str,
    pub to: ModuleId,
    pub input: &'a str,
}

impl Display for ModulesConnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connected {}.{} -> {}.{}",
            self.from, self.output, self.to, self.input
        )
    }
}

impl StructuredLog for ModulesConnected<'_> {
    fn log(&self) {
        tracing::info!(
            from = %self.from,
            output = self.output,
            to = %self.to,
            input = self.input,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connect",
            span_name = name,
            from = %self.from,
            output = self.output,
            to = %self.to,
            input = self.input,
        )
    }
}

/// A connection was removed.
///
/// # Log Level
/// `info!`
pub struct ModulesDisconnected<'a> {
    pub from: ModuleId,
    pub output: &'a str,
    pub to: ModuleId,
    pub input: &'a str,
}

impl Display for ModulesDisconnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Disconnected {}.{} -> {}.{}",
            self.from, self.output, self.to, self.input
        )
    }
}

impl StructuredLog for ModulesDisconnected<'_> {
    fn log(&self) {
        tracing::info!(
            from = %self.from,
            output = self.output,
            to = %self.to,
            input = self.input,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "disconnect",
            span_name = name,
            from = %self.from,
            output = self.output,
            to = %self.to,
            input = self.input,
        )
    }
}

/// A module and its incident edges were removed from the graph.
///
/// # Log Level
/// `info!`
pub struct ModuleRemoved {
    pub module: ModuleId,
    pub edges_removed: usize,
}

impl Display for ModuleRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed {} and {} incident edge(s)",
            self.module, self.edges_removed
        )
    }
}

impl StructuredLog for ModuleRemoved {
    fn log(&self) {
        tracing::info!(
            module = %self.module,
            edges_removed = self.edges_removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module_removed",
            span_name = name,
            module = %self.module,
            edges_removed = self.edges_removed,
        )
    }
}

/// A module and its consumers were marked dirty.
///
/// # Log Level
/// `debug!`
pub struct DirtyPropagated {
    pub origin: ModuleId,
    pub marked: usize,
}

impl Display for DirtyPropagated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Marked {} dirty, {} module(s) affected",
            self.origin, self.marked
        )
    }
}

impl StructuredLog for DirtyPropagated {
    fn log(&self) {
        tracing::debug!(origin = %self.origin, marked = self.marked, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dirty_propagated",
            span_name = name,
            origin = %self.origin,
            marked = self.marked,
        )
    }
}

/// Execution started over a scope of the graph.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionStarted<'a> {
    pub scope: &'a str,
    pub module_count: usize,
    pub level_count: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting execution of {}: {} modules in {} levels",
            self.scope, self.module_count, self.level_count
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            scope = self.scope,
            module_count = self.module_count,
            level_count = self.level_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            scope = self.scope,
            module_count = self.module_count,
            level_count = self.level_count,
        )
    }
}

/// One module body ran successfully.
///
/// # Log Level
/// `debug!` - Per-module detail
pub struct ModuleProcessed<'a> {
    pub module: ModuleId,
    pub label: &'a str,
    pub duration: std::time::Duration,
}

impl Display for ModuleProcessed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' ({}) processed in {:?}",
            self.label, self.module, self.duration
        )
    }
}

impl StructuredLog for ModuleProcessed<'_> {
    fn log(&self) {
        tracing::debug!(
            module = %self.module,
            label = self.label,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "module_processed",
            span_name = name,
            module = %self.module,
            label = self.label,
        )
    }
}

/// Execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted {
    pub executed: usize,
    pub skipped: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Execution completed: {} modules ran, {} clean modules skipped in {:?}",
            self.executed, self.skipped, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        tracing::info!(
            executed = self.executed,
            skipped = self.skipped,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            executed = self.executed,
            skipped = self.skipped,
            duration = ?self.duration,
        )
    }
}

/// Execution stopped because a module failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub module: ModuleId,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Execution failed at {}: {}", self.module, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            module = %self.module,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            module = %self.module,
            error = %self.error,
        )
    }
}

/// Execution refused because the scope contains a cycle.
///
/// # Log Level
/// `error!` - Configuration error
pub struct CycleDetected<'a> {
    pub cycle: &'a [ModuleId],
}

impl Display for CycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let path: Vec<String> = self.cycle.iter().map(ToString::to_string).collect();
        write!(f, "Cyclic graph, refusing to execute: {}", path.join(" -> "))
    }
}

impl StructuredLog for CycleDetected<'_> {
    fn log(&self) {
        tracing::error!(cycle_length = self.cycle.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cycle_detected",
            span_name = name,
            cycle_length = self.cycle.len(),
        )
    }
}
