// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed slots ("tendrils") and the registries that hold them.
//!
//! * [`Tendril`] - one type-erased value cell with a runtime type check
//! * [`Spore`] - a typed handle a module keeps as a field
//! * [`Tendrils`] - a module's registry for one slot kind
//!
//! ```
//! use plasmflow::tendrils::{TendrilKind, Tendrils};
//!
//! let inputs = Tendrils::new(TendrilKind::Input);
//! let x = inputs.declare_with_default("x", "an input", 0i32).unwrap();
//! x.set(5).unwrap();
//! assert_eq!(inputs.get::<i32>("x").unwrap(), 5);
//! assert!(inputs.get::<f64>("x").is_err());
//! ```

mod registry;
mod serialization;
mod spore;
mod tendril;
mod type_registry;
mod value;

pub use registry::{TendrilKind, Tendrils};
pub use spore::Spore;
pub use tendril::{make_tendril, Tendril, TendrilPtr};
pub use type_registry::{is_registered, register_type, register_type_as};
pub use value::{SlotValue, TypeTag};
