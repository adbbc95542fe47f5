// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The module graph and its execution driver.

pub mod plasm;
mod topology;

#[cfg(test)]
mod integration_tests;

pub use plasm::{Edge, ExecutionSummary, Plasm};
pub(crate) use topology::find_cycle;
