// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output goes through message types in [`messages`]. Each one
//! implements `Display` for the human-readable line and [`messages::StructuredLog`]
//! to emit the same event with structured fields at its fixed level.
//!
//! # Usage
//!
//! ```rust
//! use plasmflow::observability::messages::plasm::ExecutionStarted;
//! use plasmflow::observability::messages::StructuredLog;
//!
//! let msg = ExecutionStarted {
//!     scope: "whole graph",
//!     module_count: 3,
//!     level_count: 2,
//! };
//!
//! msg.log();
//! ```
//!
//! The library never installs a subscriber; the binary does, honouring `RUST_LOG`.

pub mod messages;
