// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod plasm;
mod tendril;

pub use config::{ConfigError, ValidationError};
pub use plasm::PlasmError;
pub use tendril::TendrilError;
