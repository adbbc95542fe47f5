// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide registry of value types that can cross the dynamic boundary.
//!
//! Tendrils erase their value type, so serialization and host-value conversion
//! need a table from type identity to a codec. Primitive types are registered at
//! startup; module authors add their own with [`register_type`].

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::TendrilError;
use crate::tendrils::value::SlotValue;
use crate::utils::sync::{read, write};

type Encoder = fn(&dyn Any) -> Result<Value, String>;
type Decoder = fn(Value) -> Result<Box<dyn SlotValue>, String>;

struct Codec {
    name: &'static str,
    rust_name: &'static str,
    encode: Encoder,
    decode: Decoder,
}

#[derive(Default)]
struct TypeRegistry {
    by_id: HashMap<TypeId, Arc<Codec>>,
    by_name: HashMap<&'static str, Arc<Codec>>,
}

impl TypeRegistry {
    fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert::<bool>("bool");
        registry.insert::<i8>("i8");
        registry.insert::<i16>("i16");
        registry.insert::<i32>("i32");
        registry.insert::<i64>("i64");
        registry.insert::<u8>("u8");
        registry.insert::<u16>("u16");
        registry.insert::<u32>("u32");
        registry.insert::<u64>("u64");
        registry.insert::<usize>("usize");
        registry.insert::<f32>("f32");
        registry.insert::<f64>("f64");
        registry.insert::<String>("string");
        registry.insert::<Vec<f64>>("vec<f64>");
        registry.insert::<Vec<i64>>("vec<i64>");
        registry.insert::<Vec<String>>("vec<string>");
        registry
    }

    fn insert<T>(&mut self, name: &'static str)
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let codec = Arc::new(Codec {
            name,
            rust_name: type_name::<T>(),
            encode: encode::<T>,
            decode: decode::<T>,
        });
        // re-registration under a new name drops the stale name
        if let Some(previous) = self.by_id.insert(TypeId::of::<T>(), codec.clone()) {
            self.by_name.remove(previous.name);
        }
        self.by_name.insert(name, codec);
    }
}

fn encode<T: Serialize + 'static>(value: &dyn Any) -> Result<Value, String> {
    let typed = value
        .downcast_ref::<T>()
        .ok_or_else(|| format!("value is not a {}", type_name::<T>()))?;
    if has_non_finite_float(value) {
        return Err("NaN and infinite floats have no JSON representation".to_string());
    }
    serde_json::to_value(typed).map_err(|e| e.to_string())
}

// serde_json writes these as null, which no float decoder accepts back
fn has_non_finite_float(value: &dyn Any) -> bool {
    if let Some(v) = value.downcast_ref::<f64>() {
        !v.is_finite()
    } else if let Some(v) = value.downcast_ref::<f32>() {
        !v.is_finite()
    } else if let Some(values) = value.downcast_ref::<Vec<f64>>() {
        values.iter().any(|v| !v.is_finite())
    } else {
        false
    }
}

fn decode<T>(value: Value) -> Result<Box<dyn SlotValue>, String>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    serde_json::from_value::<T>(value)
        .map(|typed| Box::new(typed) as Box<dyn SlotValue>)
        .map_err(|e| e.to_string())
}

static REGISTRY: Lazy<RwLock<TypeRegistry>> =
    Lazy::new(|| RwLock::new(TypeRegistry::with_builtins()));

/// Register `T` under its Rust type name.
pub fn register_type<T>()
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    register_type_as::<T>(type_name::<T>());
}

/// Register `T` under an explicit, stable name used in serialized output.
pub fn register_type_as<T>(name: &'static str)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    write(&REGISTRY).insert::<T>(name);
}

pub fn is_registered<T: 'static>() -> bool {
    read(&REGISTRY).by_id.contains_key(&TypeId::of::<T>())
}

/// Serialized name for a registered type id.
pub(crate) fn serial_name(id: TypeId) -> Option<&'static str> {
    read(&REGISTRY).by_id.get(&id).map(|codec| codec.name)
}

fn codec_for(id: TypeId) -> Option<Arc<Codec>> {
    read(&REGISTRY).by_id.get(&id).cloned()
}

/// Encode a stored value. The returned error carries no key; callers annotate it.
pub(crate) fn to_json(value: &dyn SlotValue) -> Result<(&'static str, Value), TendrilError> {
    let tag = value.type_tag();
    let codec = codec_for(tag.id()).ok_or(TendrilError::NotSerializable {
        key: String::new(),
        type_name: tag.name(),
    })?;
    let json = (codec.encode)(value.as_any()).map_err(|reason| TendrilError::ValueConversion {
        key: String::new(),
        type_name: codec.rust_name,
        reason,
    })?;
    Ok((codec.name, json))
}

/// Decode a value of an already known type (used when writing into a typed tendril).
pub(crate) fn from_json_as(id: TypeId, rust_name: &'static str, value: Value) -> Result<Box<dyn SlotValue>, TendrilError> {
    let codec = codec_for(id).ok_or(TendrilError::NotSerializable {
        key: String::new(),
        type_name: rust_name,
    })?;
    (codec.decode)(value).map_err(|reason| TendrilError::ValueConversion {
        key: String::new(),
        type_name: codec.rust_name,
        reason,
    })
}

/// Decode a value whose type is only known by its serialized name.
pub(crate) fn from_json_named(name: &str, value: Value) -> Result<Box<dyn SlotValue>, TendrilError> {
    let codec = read(&REGISTRY)
        .by_name
        .get(name)
        .cloned()
        .ok_or_else(|| TendrilError::UnknownType {
            key: String::new(),
            type_name: name.to_string(),
        })?;
    (codec.decode)(value).map_err(|reason| TendrilError::ValueConversion {
        key: String::new(),
        type_name: codec.rust_name,
        reason,
    })
}
