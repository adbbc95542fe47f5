// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `plasm` - graph edits and execution events
//! * `tendrils` - slot declaration and field binding
//! * `validation` - pipeline description validation

use tracing::Span;

pub mod plasm;
pub mod tendrils;
pub mod validation;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// A span carrying the same fields, for work done on behalf of this event.
    fn span(&self, name: &str) -> Span;
}
