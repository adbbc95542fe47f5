// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Number of times `run` executes a pipeline when the file doesn't say
pub const DEFAULT_ITERATIONS: usize = 1;
/// Upper bound on `execution.iterations`, to catch typos like `1000000`
pub const MAX_ITERATIONS: usize = 10_000;
/// Separator between module id and slot name in connection endpoints
pub const ENDPOINT_SEPARATOR: char = '.';
