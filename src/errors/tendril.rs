// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by tendrils, spores and the tendrils registry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TendrilError {
    /// Lookup of a slot name that was never declared.
    #[error("no tendril named '{key}'")]
    KeyNotFound { key: String },

    /// The stored type differs from the requested one.
    #[error("type mismatch on '{key}': expected {expected}, actual {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A spore was read or written before it was bound to a tendril.
    #[error("spore of type {expected} is not bound to a tendril")]
    NotBound { expected: &'static str },

    #[error("a tendril named '{key}' is already declared")]
    DuplicateKey { key: String },

    /// The value type has no entry in the type registry.
    #[error("tendril '{key}' holds {type_name}, which is not registered for serialization")]
    NotSerializable { key: String, type_name: &'static str },

    /// A serialized entry names a type the registry does not know.
    #[error("tendril '{key}' names unknown type '{type_name}'")]
    UnknownType { key: String, type_name: String },

    #[error("could not convert value of tendril '{key}' ({type_name}): {reason}")]
    ValueConversion {
        key: String,
        type_name: &'static str,
        reason: String,
    },
}

impl TendrilError {
    /// Attach the registry key an error surfaced under, keeping its kind.
    ///
    /// Errors that already name a key are re-labelled only when the key is empty,
    /// so the innermost (most specific) name wins.
    pub fn with_key(mut self, name: &str) -> Self {
        if let Some(key) = self.value_key_mut() {
            if key.is_empty() {
                *key = name.to_string();
            }
        }
        self
    }

    /// Label the error with the name it was looked up under, replacing any
    /// name the tendril itself carries. A tendril shared between registries
    /// can be stored under different names in each.
    pub fn looked_up_as(mut self, name: &str) -> Self {
        if let Some(key) = self.value_key_mut() {
            *key = name.to_string();
        }
        self
    }

    fn value_key_mut(&mut self) -> Option<&mut String> {
        match self {
            TendrilError::TypeMismatch { key, .. }
            | TendrilError::ValueConversion { key, .. }
            | TendrilError::NotSerializable { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, TendrilError::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_key_fills_in_missing_key() {
        let err = TendrilError::TypeMismatch {
            key: String::new(),
            expected: "i32",
            actual: "f64",
        };
        let annotated = err.with_key("x");
        assert_eq!(
            annotated,
            TendrilError::TypeMismatch {
                key: "x".to_string(),
                expected: "i32",
                actual: "f64",
            }
        );
    }

    #[test]
    fn with_key_keeps_existing_key_and_kind() {
        let err = TendrilError::TypeMismatch {
            key: "inner".to_string(),
            expected: "i32",
            actual: "f64",
        };
        let annotated = err.with_key("outer");
        assert!(annotated.is_type_mismatch());
        assert!(annotated.to_string().contains("'inner'"));

        let missing = TendrilError::KeyNotFound {
            key: "y".to_string(),
        };
        assert_eq!(missing.clone().with_key("z"), missing);
    }

    #[test]
    fn looked_up_as_replaces_existing_key() {
        let err = TendrilError::TypeMismatch {
            key: "original".to_string(),
            expected: "i32",
            actual: "f64",
        };
        let relabelled = err.looked_up_as("alias");
        assert!(relabelled.is_type_mismatch());
        assert!(relabelled.to_string().contains("'alias'"));

        let missing = TendrilError::KeyNotFound {
            key: "y".to_string(),
        };
        assert_eq!(missing.clone().looked_up_as("z"), missing);
    }
}
