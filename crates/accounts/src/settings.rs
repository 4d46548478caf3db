//! Per-account settings, persisted as JSON map columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use prepdeck_core::AccountId;

/// Ordered string-keyed map of arbitrary JSON values.
///
/// Settings rows keep two of these (basic and advanced), each stored in a
/// single JSON text column.
pub type SettingsMap = BTreeMap<String, serde_json::Value>;

/// Settings attached to one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSettings {
    pub account_id: AccountId,
    pub basic: SettingsMap,
    pub advanced: SettingsMap,
}

impl AccountSettings {
    pub fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            basic: SettingsMap::new(),
            advanced: SettingsMap::new(),
        }
    }
}

/// Serialize a settings map into its column representation.
pub fn to_json_column(map: &SettingsMap) -> serde_json::Result<String> {
    serde_json::to_string(map)
}

/// Parse a settings map out of its column representation.
///
/// A NULL/empty column means "no settings yet" and becomes an empty map;
/// anything else must be a JSON object.
pub fn from_json_column(column: Option<&str>) -> serde_json::Result<SettingsMap> {
    match column {
        None => Ok(SettingsMap::new()),
        Some(raw) if raw.trim().is_empty() => Ok(SettingsMap::new()),
        Some(raw) => serde_json::from_str(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_or_missing_column_becomes_an_empty_map() {
        assert!(from_json_column(None).unwrap().is_empty());
        assert!(from_json_column(Some("")).unwrap().is_empty());
        assert!(from_json_column(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn round_trip_preserves_entries() {
        let mut map = SettingsMap::new();
        map.insert("theme".to_string(), json!("dark"));
        map.insert("notifications".to_string(), json!({ "email": true }));

        let column = to_json_column(&map).unwrap();
        let restored = from_json_column(Some(&column)).unwrap();

        assert_eq!(restored, map);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(from_json_column(Some("{not json")).is_err());
    }

    #[test]
    fn non_object_json_is_an_error() {
        assert!(from_json_column(Some("[1, 2]")).is_err());
    }
}
