// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for slot declaration and deferred field binding.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;
use crate::tendrils::TendrilKind;

/// A slot was declared in a registry.
///
/// # Log Level
/// `debug!` - Happens for every slot of every module
pub struct SlotDeclared<'a> {
    pub kind: TendrilKind,
    pub name: &'a str,
    pub type_name: &'a str,
}

impl Display for SlotDeclared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Declared {} slot '{}' of type {}", self.kind, self.name, self.type_name)
    }
}

impl StructuredLog for SlotDeclared<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = %self.kind,
            slot = self.name,
            type_name = self.type_name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "slot_declared",
            span_name = name,
            kind = %self.kind,
            slot = self.name,
            type_name = self.type_name,
        )
    }
}

/// A slot name was declared twice in one registry.
///
/// # Log Level
/// `warn!` - Usually a module authoring mistake
pub struct DuplicateSlotRejected<'a> {
    pub kind: TendrilKind,
    pub name: &'a str,
}

impl Display for DuplicateSlotRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected duplicate {} slot '{}'", self.kind, self.name)
    }
}

impl StructuredLog for DuplicateSlotRejected<'_> {
    fn log(&self) {
        tracing::warn!(kind = %self.kind, slot = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "duplicate_slot",
            span_name = name,
            kind = %self.kind,
            slot = self.name,
        )
    }
}

/// Deferred field bindings fired for a module instance.
///
/// # Log Level
/// `debug!`
pub struct BindingsRealized<'a> {
    pub kind: TendrilKind,
    pub module_type: &'a str,
    pub count: usize,
}

impl Display for BindingsRealized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bound {} {} field(s) of {}",
            self.count, self.kind, self.module_type
        )
    }
}

impl StructuredLog for BindingsRealized<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = %self.kind,
            module_type = self.module_type,
            count = self.count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "bindings_realized",
            span_name = name,
            kind = %self.kind,
            module_type = self.module_type,
            count = self.count,
        )
    }
}
