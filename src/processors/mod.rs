// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in processors.
//!
//! Small numeric building blocks used by the CLI and by pipeline descriptions:
//! - **constant**: emits a configured value
//! - **add** / **multiply**: combine two inputs
//! - **accumulate**: running total across executions
//! - **printer**: formats its input and writes it to stdout
//!
//! [`ModuleFactory`] maps the names used in pipeline files to constructors.

pub mod accumulate;
pub mod add;
pub mod constant;
pub mod factory;
pub mod multiply;
pub mod printer;
#[cfg(test)]
pub mod stub;

pub use accumulate::AccumulateProcessor;
pub use add::AddProcessor;
pub use constant::ConstantProcessor;
pub use factory::ModuleFactory;
pub use multiply::MultiplyProcessor;
pub use printer::PrinterProcessor;
