//! Settings document migrations
//!
//! Documents carry a `version` field. Unversioned documents are treated as
//! version 0 and upgraded in place before being decoded into
//! [`UserSettings`].

use serde_json::{Map, Value};

use super::{UserSettings, SETTINGS_VERSION};
use crate::errors::{IdlerError, Result};

/// Result of running a stored document through [`migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub settings: UserSettings,
    /// Version the document was stored with.
    pub from_version: u32,
    /// Whether the stored document differs from what should be written back.
    pub changed: bool,
}

/// Upgrade a raw settings document to the current schema.
pub fn migrate(value: Value) -> Result<Migrated> {
    let Value::Object(mut document) = value else {
        return Err(IdlerError::InvalidInput("settings document must be a JSON object".into()));
    };

    let from_version = match document.get("version") {
        None | Some(Value::Null) => 0,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| IdlerError::InvalidInput(format!("invalid settings version: {v}")))?,
    };

    if from_version > SETTINGS_VERSION {
        return Err(IdlerError::Config(format!(
            "settings version {from_version} is newer than supported version {SETTINGS_VERSION}"
        )));
    }

    let original = Value::Object(document.clone());

    if from_version == 0 {
        upgrade_v0(&mut document);
    }
    document.insert("version".into(), Value::from(SETTINGS_VERSION));

    let mut upgraded = Value::Object(document);
    let defaults = serde_json::to_value(UserSettings::default())
        .map_err(|e| IdlerError::Internal(format!("failed to serialize default settings: {e}")))?;
    merge_defaults(&mut upgraded, &defaults);

    let changed = upgraded != original;
    let settings: UserSettings = serde_json::from_value(upgraded)
        .map_err(|e| IdlerError::InvalidInput(format!("failed to parse settings: {e}")))?;

    Ok(Migrated { settings, from_version, changed })
}

/// Recursively copy keys present in `defaults` but missing from `user`.
/// Existing values, including arrays and nulls, are left untouched.
pub fn merge_defaults(user: &mut Value, defaults: &Value) {
    if let (Value::Object(user_map), Value::Object(default_map)) = (user, defaults) {
        for (key, default_value) in default_map {
            match user_map.get_mut(key) {
                Some(existing) => merge_defaults(existing, default_value),
                None => {
                    user_map.insert(key.clone(), default_value.clone());
                }
            }
        }
    }
}

/// v0 kept free-game toggles in their own top-level section and stored
/// credentials under the cookie names.
fn upgrade_v0(document: &mut Map<String, Value>) {
    if let Some(Value::Object(free_games)) = document.remove("freeGames") {
        let general = document
            .entry("general")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(general) = general {
            for key in ["freeGameNotifications", "autoRedeemFreeGames"] {
                if let Some(value) = free_games.get(key) {
                    general.entry(key).or_insert_with(|| value.clone());
                }
            }
        }
    }

    let credentials = document
        .get_mut("cardFarming")
        .and_then(Value::as_object_mut)
        .and_then(|card_farming| card_farming.get_mut("credentials"))
        .and_then(Value::as_object_mut);
    if let Some(credentials) = credentials {
        for (legacy, current) in
            [("sessionid", "sid"), ("steamLoginSecure", "sls"), ("steamMachineAuth", "sma")]
        {
            if let Some(value) = credentials.remove(legacy) {
                credentials.entry(current).or_insert(value);
            }
        }
    }
}
