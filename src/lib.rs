// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // pipeline descriptions + builder
pub mod engine;     // graph + execution
pub mod errors;     // error handling
pub mod module;     // graph nodes
pub mod observability;
pub mod processors; // built-in modules
pub mod tendrils;   // typed slots
pub mod traits;     // processor abstraction
mod utils;
