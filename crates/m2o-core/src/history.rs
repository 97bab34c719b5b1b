//! Key history types.
//!
//! `KeyModification` is what the state store records for every committed
//! write or delete of a key. `HistoricalEntry` is the read-only projection of
//! one modification returned to callers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TransactionId;

/// One committed write or delete of a key, as recorded by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModification {
    /// Transaction that committed the modification.
    pub tx_id: TransactionId,

    /// Raw value written, or `None` for a delete.
    pub value: Option<Vec<u8>>,

    /// Transaction timestamp assigned by the host.
    pub timestamp: DateTime<Utc>,
}

impl KeyModification {
    /// Whether this modification deleted the key.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

/// A reconstructed historical snapshot of a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
    /// Transaction that produced this version.
    pub transaction_id: TransactionId,

    /// The JSON value written, or `null` for a delete.
    pub value: Option<serde_json::Value>,

    /// RFC 3339 commit timestamp.
    pub timestamp: String,

    /// Whether this version is a tombstone.
    pub is_delete: bool,

    /// Set when the stored bytes were not JSON and `value` holds their raw text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub undecodable: bool,
}

impl HistoricalEntry {
    /// Project a store modification, embedding the value verbatim.
    ///
    /// Bytes that are not valid JSON are kept as a lossy UTF-8 string and the
    /// entry is flagged `undecodable`; projection never fails.
    #[must_use]
    pub fn from_modification(modification: KeyModification) -> Self {
        let timestamp = modification
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Nanos, true);

        let (value, undecodable) = match modification.value {
            None => (None, false),
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(json) => (Some(json), false),
                Err(_) => (
                    Some(serde_json::Value::String(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    )),
                    true,
                ),
            },
        };

        Self {
            transaction_id: modification.tx_id,
            is_delete: value.is_none(),
            value,
            timestamp,
            undecodable,
        }
    }

    /// The `partnerName` field of the snapshot, if it has one.
    #[must_use]
    pub fn partner_name(&self) -> Option<&str> {
        if self.undecodable {
            return None;
        }
        self.value
            .as_ref()
            .and_then(|v| v.get("partnerName"))
            .and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn modification(value: Option<&[u8]>) -> KeyModification {
        KeyModification {
            tx_id: TransactionId::generate(),
            value: value.map(<[u8]>::to_vec),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn json_values_are_embedded() {
        let entry = HistoricalEntry::from_modification(modification(Some(
            br#"{"partnerName":"partnera","cumulativeTokens":50}"#,
        )));
        assert!(!entry.is_delete);
        assert!(!entry.undecodable);
        assert_eq!(entry.value.as_ref().unwrap()["cumulativeTokens"], 50);
        assert_eq!(entry.partner_name(), Some("partnera"));
        assert_eq!(entry.timestamp, "2024-01-01T12:00:00.000000000Z");
    }

    #[test]
    fn deletes_have_null_value() {
        let entry = HistoricalEntry::from_modification(modification(None));
        assert!(entry.is_delete);
        assert!(entry.value.is_none());

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["value"].is_null());
        assert_eq!(json["isDelete"], true);
        assert!(json.get("undecodable").is_none());
    }

    #[test]
    fn raw_bytes_survive_decode_failure() {
        let entry = HistoricalEntry::from_modification(modification(Some(b"not json")));
        assert!(entry.undecodable);
        assert!(!entry.is_delete);
        assert_eq!(entry.value, Some(serde_json::json!("not json")));
        assert_eq!(entry.partner_name(), None);
    }
}
