// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The module graph and its incremental execution driver.
//!
//! Vertices are modules, edges connect one module's output slot to another's
//! input slot. Connecting two slots also links their tendrils, so a producer's
//! write is what its consumer reads; nothing is copied at execution time.
//!
//! The graph has no internal lock. Edits take `&mut self`, execution takes
//! `&self`, so the borrow checker keeps the two phases apart for a single owner;
//! callers sharing a `Plasm` across threads wrap it in their own lock.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::engine::topology::compute_levels;
use crate::errors::PlasmError;
use crate::module::{ModuleId, ModulePtr};
use crate::observability::messages::plasm::{
    CycleDetected, DirtyPropagated, ExecutionCompleted, ExecutionFailed, ExecutionStarted,
    ModuleRemoved, ModulesConnected, ModulesDisconnected,
};
use crate::observability::messages::StructuredLog;

/// One output-to-input connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub from: ModuleId,
    pub output: String,
    pub to: ModuleId,
    pub input: String,
}

/// What a call to [`Plasm::go`] did.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSummary {
    /// Modules whose bodies ran, in execution order.
    pub executed: Vec<ModuleId>,
    /// Clean modules inside the scope that were left alone.
    pub skipped: usize,
    pub levels: usize,
    pub duration: Duration,
}

#[derive(Default)]
pub struct Plasm {
    modules: BTreeMap<ModuleId, ModulePtr>,
    edges: Vec<Edge>,
}

impl Plasm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module without connecting it. Inserting a module twice is a no-op.
    pub fn insert(&mut self, module: ModulePtr) -> ModuleId {
        let id = module.id();
        self.modules.entry(id).or_insert(module);
        id
    }

    pub fn module(&self, id: ModuleId) -> Option<&ModulePtr> {
        self.modules.get(&id)
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Connect `from.outputs[output]` to `to.inputs[input]`.
    ///
    /// Both slots must exist and hold the same type; the input must not already
    /// be fed by another output. Both modules join the graph if they were not in
    /// it, and the consumer is marked dirty.
    pub fn connect(
        &mut self,
        from: &ModulePtr,
        output: &str,
        to: &ModulePtr,
        input: &str,
    ) -> Result<(), PlasmError> {
        let source = from.outputs().at(output)?;
        let sink = to.inputs().at(input)?;
        if !source.same_type(&sink) {
            return Err(PlasmError::ConnectionTypeError {
                from: from.id(),
                output: output.to_string(),
                to: to.id(),
                input: input.to_string(),
                output_type: source.type_name(),
                input_type: sink.type_name(),
            });
        }
        if self
            .edges
            .iter()
            .any(|edge| edge.to == to.id() && edge.input == input)
        {
            return Err(PlasmError::InputAlreadyConnected {
                module: to.id(),
                input: input.to_string(),
            });
        }

        source.connect(&sink)?;
        self.insert(from.clone());
        self.insert(to.clone());
        self.edges.push(Edge {
            from: from.id(),
            output: output.to_string(),
            to: to.id(),
            input: input.to_string(),
        });
        ModulesConnected {
            from: from.id(),
            output,
            to: to.id(),
            input,
        }
        .log();

        self.mark_dirty(to.id())
    }

    /// Remove one connection. The input keeps its last value in a private cell.
    pub fn disconnect(
        &mut self,
        from: ModuleId,
        output: &str,
        to: ModuleId,
        input: &str,
    ) -> Result<(), PlasmError> {
        let position = self
            .edges
            .iter()
            .position(|e| e.from == from && e.output == output && e.to == to && e.input == input)
            .ok_or_else(|| PlasmError::NotConnected {
                from,
                output: output.to_string(),
                to,
                input: input.to_string(),
            })?;
        self.edges.remove(position);
        self.detach_input(to, input);
        ModulesDisconnected {
            from,
            output,
            to,
            input,
        }
        .log();
        self.mark_dirty(to)
    }

    /// Remove a module and every edge touching it.
    ///
    /// Its former consumers lose their upstream and are marked dirty; their
    /// inputs keep the last value they saw.
    pub fn remove(&mut self, id: ModuleId) -> Result<ModulePtr, PlasmError> {
        let module = self
            .modules
            .remove(&id)
            .ok_or(PlasmError::ModuleNotFound { module: id })?;

        let (incident, kept): (Vec<Edge>, Vec<Edge>) = self
            .edges
            .drain(..)
            .partition(|edge| edge.from == id || edge.to == id);
        self.edges = kept;

        let mut consumers = BTreeSet::new();
        for edge in &incident {
            if edge.to == id {
                if let Some(tendril) = module.inputs().find(&edge.input) {
                    tendril.disconnect();
                }
            } else {
                self.detach_input(edge.to, &edge.input);
                consumers.insert(edge.to);
            }
        }
        ModuleRemoved {
            module: id,
            edges_removed: incident.len(),
        }
        .log();

        for consumer in consumers {
            self.mark_dirty(consumer)?;
        }
        Ok(module)
    }

    fn detach_input(&self, module: ModuleId, input: &str) {
        if let Some(tendril) = self
            .modules
            .get(&module)
            .and_then(|m| m.inputs().find(input))
        {
            tendril.disconnect();
        }
    }

    /// Mark `id` and everything downstream of it dirty.
    ///
    /// Everything downstream of a dirty module is already dirty, so the walk
    /// stops at consumers that are dirty and repeated calls touch only `id`.
    pub fn mark_dirty(&self, id: ModuleId) -> Result<(), PlasmError> {
        let origin = self
            .modules
            .get(&id)
            .ok_or(PlasmError::ModuleNotFound { module: id })?;
        origin.set_dirty(true);
        let mut marked = 1;
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for edge in self.edges.iter().filter(|edge| edge.from == current) {
                if let Some(consumer) = self.modules.get(&edge.to) {
                    if !consumer.is_dirty() {
                        consumer.set_dirty(true);
                        marked += 1;
                        queue.push_back(edge.to);
                    }
                }
            }
        }
        DirtyPropagated { origin: id, marked }.log();
        Ok(())
    }

    /// Ids of every dirty module.
    pub fn dirty_modules(&self) -> BTreeSet<ModuleId> {
        self.modules
            .iter()
            .filter(|(_, module)| module.is_dirty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Run the dirty modules `start` depends on, then `start` itself.
    pub fn go(&self, start: ModuleId) -> Result<ExecutionSummary, PlasmError> {
        if !self.modules.contains_key(&start) {
            return Err(PlasmError::ModuleNotFound { module: start });
        }
        let scope = self.upstream_closure(start);
        self.execute(&scope, &start.to_string())
    }

    /// Run every dirty module in the graph.
    pub fn go_all(&self) -> Result<ExecutionSummary, PlasmError> {
        let scope: BTreeSet<ModuleId> = self.modules.keys().copied().collect();
        self.execute(&scope, "whole graph")
    }

    /// Producers-first execution of the dirty modules in `scope`.
    ///
    /// The whole scope is levelled before any body runs, so a cyclic scope fails
    /// without side effects. A failing module stays dirty and stops the run;
    /// modules after it are not attempted.
    fn execute(&self, scope: &BTreeSet<ModuleId>, label: &str) -> Result<ExecutionSummary, PlasmError> {
        let started = Instant::now();
        let adjacency = self.adjacency_within(scope);
        let levels = compute_levels(&adjacency).map_err(|cycle| {
            CycleDetected { cycle: &cycle }.log();
            PlasmError::CyclicGraph { cycle }
        })?;

        let start_msg = ExecutionStarted {
            scope: label,
            module_count: scope.len(),
            level_count: levels.len(),
        };
        let span = start_msg.span("plasm_go");
        let _guard = span.enter();
        start_msg.log();

        let mut summary = ExecutionSummary {
            levels: levels.len(),
            ..Default::default()
        };
        for level in &levels {
            for id in level {
                let Some(module) = self.modules.get(id) else {
                    continue;
                };
                if !module.is_dirty() {
                    summary.skipped += 1;
                    continue;
                }
                if let Err(error) = module.process() {
                    ExecutionFailed {
                        module: *id,
                        error: &error,
                    }
                    .log();
                    return Err(error);
                }
                module.set_dirty(false);
                summary.executed.push(*id);
            }
        }

        summary.duration = started.elapsed();
        ExecutionCompleted {
            executed: summary.executed.len(),
            skipped: summary.skipped,
            duration: summary.duration,
        }
        .log();
        Ok(summary)
    }

    /// `id` plus every module it transitively consumes from.
    fn upstream_closure(&self, id: ModuleId) -> BTreeSet<ModuleId> {
        let mut producers: BTreeMap<ModuleId, Vec<ModuleId>> = BTreeMap::new();
        for edge in &self.edges {
            producers.entry(edge.to).or_default().push(edge.from);
        }
        let mut closure = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if closure.insert(current) {
                stack.extend(producers.get(&current).into_iter().flatten().copied());
            }
        }
        closure
    }

    fn adjacency_within(&self, scope: &BTreeSet<ModuleId>) -> BTreeMap<ModuleId, Vec<ModuleId>> {
        let mut adjacency: BTreeMap<ModuleId, Vec<ModuleId>> =
            scope.iter().map(|id| (*id, Vec::new())).collect();
        for edge in &self.edges {
            if scope.contains(&edge.to) {
                if let Some(targets) = adjacency.get_mut(&edge.from) {
                    targets.push(edge.to);
                }
            }
        }
        adjacency
    }

    /// Snapshot of every vertex, ordered by id.
    pub fn vertices(&self) -> Vec<(ModuleId, ModulePtr)> {
        self.modules
            .iter()
            .map(|(id, module)| (*id, module.clone()))
            .collect()
    }

    /// Snapshot of every edge, in connection order.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges.clone()
    }

    /// Write the graph in graphviz `dot` form.
    pub fn viz<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph plasm {{")?;
        for (id, module) in &self.modules {
            writeln!(
                out,
                "  {} [label=\"{}\\n{}\"];",
                id.raw(),
                escape(module.label()),
                escape(module.type_name())
            )?;
        }
        for edge in &self.edges {
            writeln!(
                out,
                "  {} -> {} [label=\"{} -> {}\"];",
                edge.from.raw(),
                edge.to.raw(),
                escape(&edge.output),
                escape(&edge.input)
            )?;
        }
        writeln!(out, "}}")
    }

    pub fn viz_string(&self) -> String {
        let mut buffer = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.viz(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl std::fmt::Debug for Plasm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plasm")
            .field("module_count", &self.modules.len())
            .field("edges", &self.edges)
            .finish()
    }
}
