//! Defaults-then-overrides merging for open attribute sets.
//!
//! Macros and token attributes have a documented set of fields plus an
//! `extra` map for anything else the caller supplies. Overrides are applied
//! on top of the serialized defaults and then deserialized back, so a
//! documented field only accepts values of its own type while unknown keys
//! fall through to `extra`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Apply `overrides` on top of `base`, returning the merged value
pub fn apply_overrides<T>(base: &T, overrides: Map<String, Value>) -> Result<T, TokenError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(base) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(source) => {
            return Err(TokenError::Attribute {
                key: String::new(),
                source,
            })
        }
    };

    for (key, value) in overrides {
        merged.insert(key.clone(), value);
        // Check each key as it lands so the error names the offending field
        if let Err(source) = serde_json::from_value::<T>(Value::Object(merged.clone())) {
            return Err(TokenError::Attribute { key, source });
        }
    }

    serde_json::from_value(Value::Object(merged)).map_err(|source| TokenError::Attribute {
        key: String::new(),
        source,
    })
}
