// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The per-module, per-slot-kind registry of named tendrils.
//!
//! Every operation takes the registry lock for its whole duration. Deferred
//! field bindings are the one exception: they are taken out of the registry
//! under the lock and run after it is released, because each binder looks the
//! slot up again through the registry.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::TendrilError;
use crate::observability::messages::tendrils::{BindingsRealized, DuplicateSlotRejected, SlotDeclared};
use crate::observability::messages::StructuredLog;
use crate::tendrils::spore::Spore;
use crate::tendrils::tendril::{Tendril, TendrilPtr};
use crate::utils::sync::lock;

/// Which of a module's three registries a `Tendrils` instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TendrilKind {
    Input,
    Output,
    Parameter,
}

impl fmt::Display for TendrilKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TendrilKind::Input => write!(f, "inputs"),
            TendrilKind::Output => write!(f, "outputs"),
            TendrilKind::Parameter => write!(f, "parameters"),
        }
    }
}

/// Deferred "assign slot `name` into field of the instance" action.
type Binder = Box<dyn FnOnce(&mut dyn Any, &Tendrils) -> Result<(), TendrilError> + Send>;

#[derive(Default)]
struct TendrilsInner {
    storage: BTreeMap<String, TendrilPtr>,
    // keyed by module type, so one registry could serve several implementations
    static_bindings: HashMap<TypeId, Vec<Binder>>,
}

/// Ordered map from slot name to shared tendril.
pub struct Tendrils {
    kind: TendrilKind,
    inner: Mutex<TendrilsInner>,
}

impl Tendrils {
    pub fn new(kind: TendrilKind) -> Self {
        Self {
            kind,
            inner: Mutex::new(TendrilsInner::default()),
        }
    }

    pub fn kind(&self) -> TendrilKind {
        self.kind
    }

    fn inner(&self) -> MutexGuard<'_, TendrilsInner> {
        lock(&self.inner)
    }

    /// Declare a slot of type `T` holding `T::default()`.
    ///
    /// Names are unique: declaring an existing name fails with `DuplicateKey`.
    pub fn declare<T>(&self, name: &str) -> Result<Spore<T>, TendrilError>
    where
        T: Default + Clone + Send + Sync + 'static,
    {
        self.declare_tendril_unique(name, Tendril::new::<T>())
    }

    pub fn declare_with_doc<T>(&self, name: &str, doc: &str) -> Result<Spore<T>, TendrilError>
    where
        T: Default + Clone + Send + Sync + 'static,
    {
        let tendril = Tendril::new::<T>();
        tendril.set_doc(doc);
        self.declare_tendril_unique(name, tendril)
    }

    pub fn declare_with_default<T>(
        &self,
        name: &str,
        doc: &str,
        default: T,
    ) -> Result<Spore<T>, TendrilError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let tendril = Tendril::with_value(default.clone());
        tendril.set_doc(doc);
        tendril.set_default(default)?;
        self.declare_tendril_unique(name, tendril)
    }

    fn declare_tendril_unique<T: 'static>(
        &self,
        name: &str,
        tendril: Tendril,
    ) -> Result<Spore<T>, TendrilError> {
        tendril.set_name(name);
        let tendril = Arc::new(tendril);
        {
            let mut inner = self.inner();
            if inner.storage.contains_key(name) {
                drop(inner);
                DuplicateSlotRejected {
                    kind: self.kind,
                    name,
                }
                .log();
                return Err(TendrilError::DuplicateKey {
                    key: name.to_string(),
                });
            }
            inner.storage.insert(name.to_string(), tendril.clone());
        }
        SlotDeclared {
            kind: self.kind,
            name,
            type_name: tendril.type_name(),
        }
        .log();
        Spore::from_tendril(tendril)
    }

    /// Insert a tendril whose type is only known at runtime.
    ///
    /// Behaves like a map insert: if `name` is taken, the stored tendril is kept
    /// and returned, and `tendril` is discarded.
    pub fn declare_tendril(&self, name: &str, tendril: TendrilPtr) -> TendrilPtr {
        let mut inner = self.inner();
        inner
            .storage
            .entry(name.to_string())
            .or_insert_with(|| {
                tendril.set_name(name);
                tendril
            })
            .clone()
    }

    /// Declare a slot and arrange for it to be assigned into a field of `M`.
    ///
    /// `field` plays the part of a member pointer: the first time an `M` realizes
    /// its bindings against this registry, `*field(instance)` is bound to the slot.
    pub fn declare_bound<M, T>(
        &self,
        field: fn(&mut M) -> &mut Spore<T>,
        name: &str,
        doc: &str,
        default: T,
    ) -> Result<Spore<T>, TendrilError>
    where
        M: 'static,
        T: Clone + Send + Sync + 'static,
    {
        let spore = self.declare_with_default(name, doc, default)?;
        let key = name.to_string();
        let binder: Binder = Box::new(move |instance: &mut dyn Any, tendrils: &Tendrils| {
            match instance.downcast_mut::<M>() {
                Some(instance) => field(instance).bind(tendrils.at(&key)?),
                None => Ok(()),
            }
        });
        self.inner()
            .static_bindings
            .entry(TypeId::of::<M>())
            .or_default()
            .push(binder);
        Ok(spore)
    }

    /// Run, and discard, every pending binding registered for `M`.
    ///
    /// A second call for the same type finds nothing left to do. All binders run
    /// even if one fails; the first error is returned.
    pub fn realize_potential<M: 'static>(&self, instance: &mut M) -> Result<(), TendrilError> {
        let binders = self
            .inner()
            .static_bindings
            .remove(&TypeId::of::<M>())
            .unwrap_or_default();
        if binders.is_empty() {
            return Ok(());
        }

        let count = binders.len();
        let mut first_error = None;
        for binder in binders {
            let target: &mut dyn Any = &mut *instance;
            if let Err(e) = binder(target, self) {
                first_error.get_or_insert(e);
            }
        }
        BindingsRealized {
            kind: self.kind,
            module_type: std::any::type_name::<M>(),
            count,
        }
        .log();
        first_error.map_or(Ok(()), Err)
    }

    /// Number of deferred bindings still waiting for an `M` instance.
    pub fn pending_bindings<M: 'static>(&self) -> usize {
        self.inner()
            .static_bindings
            .get(&TypeId::of::<M>())
            .map_or(0, Vec::len)
    }

    /// Copy of the value stored under `name`.
    pub fn get<T>(&self, name: &str) -> Result<T, TendrilError>
    where
        T: Clone + 'static,
    {
        let inner = self.inner();
        let tendril = inner.storage.get(name).ok_or_else(|| TendrilError::KeyNotFound {
            key: name.to_string(),
        })?;
        tendril.get::<T>().map_err(|e| e.looked_up_as(name))
    }

    pub fn with<T, R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> Result<R, TendrilError>
    where
        T: 'static,
    {
        self.at(name)?.with(f).map_err(|e| e.looked_up_as(name))
    }

    pub fn set<T>(&self, name: &str, value: T) -> Result<(), TendrilError>
    where
        T: 'static,
    {
        let inner = self.inner();
        let tendril = inner.storage.get(name).ok_or_else(|| TendrilError::KeyNotFound {
            key: name.to_string(),
        })?;
        tendril.set(value).map_err(|e| e.looked_up_as(name))
    }

    /// The tendril stored under `name`.
    pub fn at(&self, name: &str) -> Result<TendrilPtr, TendrilError> {
        self.find(name).ok_or_else(|| TendrilError::KeyNotFound {
            key: name.to_string(),
        })
    }

    pub fn find(&self, name: &str) -> Option<TendrilPtr> {
        self.inner().storage.get(name).cloned()
    }

    /// Assignment-style insert: replaces and returns whatever was stored under `name`.
    pub fn insert(&self, name: &str, tendril: TendrilPtr) -> Option<TendrilPtr> {
        tendril.set_name(name);
        self.inner().storage.insert(name.to_string(), tendril)
    }

    pub fn erase(&self, name: &str) -> Option<TendrilPtr> {
        self.inner().storage.remove(name)
    }

    pub fn clear(&self) {
        self.inner().storage.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner().storage.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner().storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner().storage.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner().storage.keys().cloned().collect()
    }

    /// Snapshot of all entries in name order.
    pub fn iter(&self) -> Vec<(String, TendrilPtr)> {
        self.inner()
            .storage
            .iter()
            .map(|(name, tendril)| (name.clone(), tendril.clone()))
            .collect()
    }

    /// Write reStructuredText documentation for every slot.
    pub fn print_doc<W: Write>(&self, out: &mut W, tendrils_name: &str) -> fmt::Result {
        let entries = self.iter();
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(out, "{}", tendrils_name)?;
        writeln!(out, "{}", "-".repeat(tendrils_name.len()))?;
        writeln!(out)?;
        for (name, tendril) in entries {
            writeln!(out, " - {} [{}]", name, tendril.type_name())?;
            if let Ok(Some(default)) = tendril.default_json() {
                writeln!(out, "   default: {}", default)?;
            }
            let doc = tendril.doc();
            if !doc.is_empty() {
                writeln!(out)?;
                writeln!(out, "   *{}*", doc)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Default for Tendrils {
    fn default() -> Self {
        Self::new(TendrilKind::Parameter)
    }
}

impl fmt::Debug for Tendrils {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tendrils")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}
