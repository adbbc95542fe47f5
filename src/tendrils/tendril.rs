// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A single named, type-erased, runtime-checked value cell.

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::errors::TendrilError;
use crate::tendrils::type_registry;
use crate::tendrils::value::{SlotValue, TypeTag};
use crate::utils::sync::{read, write};

/// Shared handle to a tendril. Registries, spores and graph edges all hold one.
pub type TendrilPtr = Arc<Tendril>;

type ValueCell = Arc<RwLock<Box<dyn SlotValue>>>;

/// One slot of a module.
///
/// The declared type is fixed at construction. The value lives in a separately
/// shared cell so that connecting two tendrils makes them read and write the
/// same storage without copying.
pub struct Tendril {
    type_tag: TypeTag,
    state: RwLock<TendrilState>,
}

struct TendrilState {
    name: String,
    doc: String,
    default: Option<Box<dyn SlotValue>>,
    cell: ValueCell,
}

impl Tendril {
    /// A tendril of type `T` holding `T::default()` and no declared default.
    pub fn new<T>() -> Self
    where
        T: Default + Clone + Send + Sync + 'static,
    {
        Self::with_value(T::default())
    }

    pub fn with_value<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(value))
    }

    pub(crate) fn from_boxed(value: Box<dyn SlotValue>) -> Self {
        Self {
            type_tag: value.type_tag(),
            state: RwLock::new(TendrilState {
                name: String::new(),
                doc: String::new(),
                default: None,
                cell: Arc::new(RwLock::new(value)),
            }),
        }
    }

    /// Build a tendril from a serialized value and the registered type name.
    pub fn from_json(type_name: &str, value: Value) -> Result<Self, TendrilError> {
        type_registry::from_json_named(type_name, value).map(Self::from_boxed)
    }

    pub fn name(&self) -> String {
        read(&self.state).name.clone()
    }

    pub(crate) fn set_name(&self, name: &str) {
        write(&self.state).name = name.to_string();
    }

    pub fn doc(&self) -> String {
        read(&self.state).doc.clone()
    }

    pub fn set_doc(&self, doc: impl Into<String>) {
        write(&self.state).doc = doc.into();
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn type_name(&self) -> &'static str {
        self.type_tag.name()
    }

    pub fn is_type<T: 'static>(&self) -> bool {
        self.type_tag.is::<T>()
    }

    pub fn same_type(&self, other: &Tendril) -> bool {
        self.type_tag == other.type_tag
    }

    fn check<T: 'static>(&self) -> Result<(), TendrilError> {
        if self.is_type::<T>() {
            Ok(())
        } else {
            Err(self.mismatch::<T>())
        }
    }

    fn mismatch<T: 'static>(&self) -> TendrilError {
        TendrilError::TypeMismatch {
            key: self.name(),
            expected: type_name::<T>(),
            actual: self.type_tag.name(),
        }
    }

    fn cell(&self) -> ValueCell {
        read(&self.state).cell.clone()
    }

    /// Copy of the current value.
    pub fn get<T>(&self) -> Result<T, TendrilError>
    where
        T: Clone + 'static,
    {
        self.with(|value: &T| value.clone())
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` runs while the value cell is read-locked; it must not write to this
    /// tendril or to one connected with it.
    pub fn with<T, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, TendrilError>
    where
        T: 'static,
    {
        self.check::<T>()?;
        let cell = self.cell();
        let guard = read(&cell);
        let value = (**guard)
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| self.mismatch::<T>())?;
        Ok(f(value))
    }

    /// Mutate the current value in place.
    pub fn with_mut<T, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, TendrilError>
    where
        T: 'static,
    {
        self.check::<T>()?;
        let cell = self.cell();
        let mut guard = write(&cell);
        match (**guard).as_any_mut().downcast_mut::<T>() {
            Some(value) => Ok(f(value)),
            None => Err(self.mismatch::<T>()),
        }
    }

    pub fn set<T>(&self, value: T) -> Result<(), TendrilError>
    where
        T: 'static,
    {
        self.with_mut(|slot: &mut T| *slot = value)
    }

    pub fn has_default(&self) -> bool {
        read(&self.state).default.is_some()
    }

    /// Record `value` as this tendril's default and make it the current value.
    pub fn set_default<T>(&self, value: T) -> Result<(), TendrilError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.check::<T>()?;
        write(&self.state).default = Some(Box::new(value.clone()));
        self.set(value)
    }

    pub fn get_default<T>(&self) -> Result<Option<T>, TendrilError>
    where
        T: Clone + 'static,
    {
        self.check::<T>()?;
        let state = read(&self.state);
        Ok(state
            .default
            .as_ref()
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
            .cloned())
    }

    /// Restore the declared default. Returns false when none was declared.
    pub fn reset_to_default(&self) -> bool {
        let (default, cell) = {
            let state = read(&self.state);
            match &state.default {
                Some(value) => ((**value).clone_value(), state.cell.clone()),
                None => return false,
            }
        };
        *write(&cell) = default;
        true
    }

    /// Make `downstream` share this tendril's value cell.
    ///
    /// After the call every write through either tendril is visible through the
    /// other. The downstream tendril's previous value is dropped.
    pub fn connect(&self, downstream: &Tendril) -> Result<(), TendrilError> {
        if !self.same_type(downstream) {
            return Err(TendrilError::TypeMismatch {
                key: downstream.name(),
                expected: self.type_tag.name(),
                actual: downstream.type_tag.name(),
            });
        }
        let cell = self.cell();
        write(&downstream.state).cell = cell;
        Ok(())
    }

    /// Give this tendril a private cell again, seeded with a copy of the shared value.
    pub fn disconnect(&self) {
        let copy = {
            let cell = self.cell();
            let guard = read(&cell);
            (**guard).clone_value()
        };
        write(&self.state).cell = Arc::new(RwLock::new(copy));
    }

    pub fn is_connected_to(&self, other: &Tendril) -> bool {
        Arc::ptr_eq(&self.cell(), &other.cell())
    }

    /// Current value through the type registry, with its serialized type name.
    pub fn to_json(&self) -> Result<(&'static str, Value), TendrilError> {
        let cell = self.cell();
        let guard = read(&cell);
        type_registry::to_json(&**guard).map_err(|e| e.with_key(&self.name()))
    }

    /// Overwrite the value from a dynamic representation of the declared type.
    pub fn set_json(&self, value: Value) -> Result<(), TendrilError> {
        let decoded = type_registry::from_json_as(self.type_tag.id(), self.type_tag.name(), value)
            .map_err(|e| e.with_key(&self.name()))?;
        let cell = self.cell();
        *write(&cell) = decoded;
        Ok(())
    }

    pub fn default_json(&self) -> Result<Option<Value>, TendrilError> {
        let state = read(&self.state);
        match &state.default {
            Some(value) => type_registry::to_json(&**value)
                .map(|(_, json)| Some(json))
                .map_err(|e| e.with_key(&state.name)),
            None => Ok(None),
        }
    }

    /// Serialized type name, if the type is registered.
    pub fn serial_type_name(&self) -> Option<&'static str> {
        type_registry::serial_name(self.type_tag.id())
    }
}

impl fmt::Debug for Tendril {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read(&self.state);
        f.debug_struct("Tendril")
            .field("name", &state.name)
            .field("type", &self.type_tag.name())
            .field("doc", &state.doc)
            .field("has_default", &state.default.is_some())
            .finish()
    }
}

/// Construct a shared tendril of type `T`.
pub fn make_tendril<T>() -> TendrilPtr
where
    T: Default + Clone + Send + Sync + 'static,
{
    Arc::new(Tendril::new::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_tendril_holds_type_default() {
        let t = Tendril::new::<i32>();
        assert_eq!(t.get::<i32>().unwrap(), 0);
        assert!(!t.has_default());
        assert!(t.is_type::<i32>());
        assert_eq!(t.type_name(), "i32");
    }

    #[test]
    fn get_with_wrong_type_is_a_mismatch() {
        let t = Tendril::with_value(1.5f64);
        t.set_name("ratio");
        let err = t.get::<i32>().unwrap_err();
        assert_eq!(
            err,
            TendrilError::TypeMismatch {
                key: "ratio".to_string(),
                expected: "i32",
                actual: "f64",
            }
        );
        assert!(t.set(3i32).is_err());
        assert_eq!(t.get::<f64>().unwrap(), 1.5);
    }

    #[test]
    fn set_default_updates_value_and_reset_restores_it() {
        let t = Tendril::new::<String>();
        t.set_default("hello".to_string()).unwrap();
        assert!(t.has_default());
        assert_eq!(t.get::<String>().unwrap(), "hello");

        t.set("changed".to_string()).unwrap();
        assert!(t.reset_to_default());
        assert_eq!(t.get::<String>().unwrap(), "hello");
        assert_eq!(t.get_default::<String>().unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn with_mut_edits_in_place() {
        let t = Tendril::with_value(vec![1i64, 2]);
        t.with_mut(|v: &mut Vec<i64>| v.push(3)).unwrap();
        assert_eq!(t.with(|v: &Vec<i64>| v.len()).unwrap(), 3);
    }

    #[test]
    fn connected_tendrils_share_writes() {
        let upstream = Tendril::new::<i32>();
        let downstream = Tendril::new::<i32>();
        upstream.connect(&downstream).unwrap();
        assert!(upstream.is_connected_to(&downstream));

        upstream.set(5).unwrap();
        assert_eq!(downstream.get::<i32>().unwrap(), 5);
        downstream.set(9).unwrap();
        assert_eq!(upstream.get::<i32>().unwrap(), 9);
    }

    #[test]
    fn connect_rejects_different_types() {
        let upstream = Tendril::new::<i32>();
        let downstream = Tendril::new::<String>();
        assert!(upstream.connect(&downstream).unwrap_err().is_type_mismatch());
        assert!(!upstream.is_connected_to(&downstream));
    }

    #[test]
    fn disconnect_keeps_last_value_privately() {
        let upstream = Tendril::new::<i32>();
        let downstream = Tendril::new::<i32>();
        upstream.connect(&downstream).unwrap();
        upstream.set(4).unwrap();

        downstream.disconnect();
        upstream.set(8).unwrap();
        assert_eq!(downstream.get::<i32>().unwrap(), 4);
        assert!(!upstream.is_connected_to(&downstream));
    }

    #[test]
    fn json_boundary_respects_declared_type() {
        let t = Tendril::new::<f64>();
        t.set_name("gain");
        t.set_json(json!(2.5)).unwrap();
        assert_eq!(t.get::<f64>().unwrap(), 2.5);
        assert_eq!(t.to_json().unwrap(), ("f64", json!(2.5)));

        let err = t.set_json(json!("loud")).unwrap_err();
        assert!(matches!(err, TendrilError::ValueConversion { ref key, .. } if key == "gain"));
    }

    #[test]
    fn unregistered_types_cannot_cross_json_boundary() {
        #[derive(Clone, Default)]
        struct Handle;

        let t = Tendril::new::<Handle>();
        t.set_name("handle");
        assert!(matches!(
            t.to_json(),
            Err(TendrilError::NotSerializable { ref key, .. }) if key == "handle"
        ));
        assert!(t.serial_type_name().is_none());
    }
}
