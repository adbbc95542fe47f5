// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type-erased slot values and the type identity carried next to them.

use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Runtime identity of the type a tendril was declared with.
///
/// Equality compares only the `TypeId`; the name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value that can live inside a tendril.
///
/// Implemented for every `Clone + Send + Sync + 'static` type; module authors
/// never implement it by hand.
pub trait SlotValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_value(&self) -> Box<dyn SlotValue>;
    fn type_tag(&self) -> TypeTag;
}

impl<T> SlotValue for T
where
    T: Any + Clone + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_value(&self) -> Box<dyn SlotValue> {
        Box::new(self.clone())
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_compare_by_type_identity() {
        assert_eq!(TypeTag::of::<i32>(), TypeTag::of::<i32>());
        assert_ne!(TypeTag::of::<i32>(), TypeTag::of::<i64>());
        assert!(TypeTag::of::<String>().is::<String>());
        assert_eq!(TypeTag::of::<f64>().name(), "f64");
    }

    #[test]
    fn boxed_value_reports_concrete_type() {
        let boxed: Box<dyn SlotValue> = Box::new(vec![1u8, 2, 3]);
        assert!(boxed.type_tag().is::<Vec<u8>>());
        assert_eq!(
            boxed.as_any().downcast_ref::<Vec<u8>>(),
            Some(&vec![1u8, 2, 3])
        );

        let copy = boxed.clone_value();
        assert!(copy.as_any().downcast_ref::<Vec<u8>>().is_some());
    }
}
