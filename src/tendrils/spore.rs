// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::TendrilError;
use crate::tendrils::tendril::TendrilPtr;

/// Typed handle onto a tendril owned by a registry.
///
/// Modules keep spores as fields and read or write their slots through them.
/// An unbound spore is valid; every access to it fails with `NotBound`.
pub struct Spore<T> {
    tendril: Option<TendrilPtr>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Spore<T> {
    pub fn unbound() -> Self {
        Self {
            tendril: None,
            _marker: PhantomData,
        }
    }

    /// Bind to `tendril`, which must hold a `T`.
    pub fn from_tendril(tendril: TendrilPtr) -> Result<Self, TendrilError> {
        let mut spore = Self::unbound();
        spore.bind(tendril)?;
        Ok(spore)
    }

    /// Rebind to another tendril. On a type mismatch the current binding is kept.
    pub fn bind(&mut self, tendril: TendrilPtr) -> Result<(), TendrilError> {
        if !tendril.is_type::<T>() {
            return Err(TendrilError::TypeMismatch {
                key: tendril.name(),
                expected: type_name::<T>(),
                actual: tendril.type_name(),
            });
        }
        self.tendril = Some(tendril);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.tendril.is_some()
    }

    pub fn tendril(&self) -> Result<&TendrilPtr, TendrilError> {
        self.tendril.as_ref().ok_or(TendrilError::NotBound {
            expected: type_name::<T>(),
        })
    }

    /// True when both spores point at the very same tendril.
    pub fn same_tendril(&self, other: &Spore<T>) -> bool {
        match (&self.tendril, &other.tendril) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, TendrilError> {
        self.tendril()?.with(f)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, TendrilError> {
        self.tendril()?.with_mut(f)
    }

    pub fn set(&self, value: T) -> Result<(), TendrilError> {
        self.tendril()?.set(value)
    }

    pub fn doc(&self) -> Result<String, TendrilError> {
        Ok(self.tendril()?.doc())
    }
}

impl<T: Clone + 'static> Spore<T> {
    pub fn get(&self) -> Result<T, TendrilError> {
        self.tendril()?.get()
    }
}

impl<T: 'static> Default for Spore<T> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T> Clone for Spore<T> {
    fn clone(&self) -> Self {
        Self {
            tendril: self.tendril.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Spore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spore")
            .field("type", &type_name::<T>())
            .field("tendril", &self.tendril)
            .finish()
    }
}
