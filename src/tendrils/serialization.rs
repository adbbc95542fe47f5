// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! (De)serialization of a registry as an ordered `name -> entry` map.
//!
//! ```yaml
//! threshold:
//!   type: i32
//!   doc: values above pass
//!   value: 10
//! ```
//!
//! Every value must be of a registered type; one unregistered value fails the
//! whole operation rather than being skipped.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::tendrils::registry::{TendrilKind, Tendrils};
use crate::tendrils::tendril::Tendril;

#[derive(Serialize, Deserialize)]
struct SerializedTendril {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    doc: String,
    value: Value,
}

impl Serialize for Tendrils {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.iter();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, tendril) in entries {
            let (type_name, value) = tendril
                .to_json()
                .map_err(|e| S::Error::custom(e.looked_up_as(&name)))?;
            let entry = SerializedTendril {
                type_name: type_name.to_string(),
                doc: tendril.doc(),
                value,
            };
            map.serialize_entry(&name, &entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tendrils {
    /// Deserializes into a parameter registry; use [`Tendrils::load_entries`] to
    /// fill a registry of another kind.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, SerializedTendril>::deserialize(deserializer)?;
        let tendrils = Tendrils::new(TendrilKind::Parameter);
        insert_entries(&tendrils, entries).map_err(D::Error::custom)?;
        Ok(tendrils)
    }
}

impl Tendrils {
    /// Fill this registry from its serialized form, replacing same-named entries.
    pub fn load_entries<'de, D: Deserializer<'de>>(&self, deserializer: D) -> Result<(), D::Error> {
        let entries = BTreeMap::<String, SerializedTendril>::deserialize(deserializer)?;
        insert_entries(self, entries).map_err(D::Error::custom)
    }
}

fn insert_entries(
    tendrils: &Tendrils,
    entries: BTreeMap<String, SerializedTendril>,
) -> Result<(), crate::errors::TendrilError> {
    // decode everything first so a bad entry leaves the registry untouched
    let mut decoded = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        let tendril = Tendril::from_json(&entry.type_name, entry.value).map_err(|e| e.with_key(&name))?;
        tendril.set_doc(entry.doc);
        decoded.push((name, tendril));
    }
    for (name, tendril) in decoded {
        tendrils.insert(&name, Arc::new(tendril));
    }
    Ok(())
}
