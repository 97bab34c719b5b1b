//! Shared encoding for persisted ledger records.
//!
//! Records are stored as flat JSON objects carrying a `type` tag. The tag is
//! checked on decode, so bytes written for one kind of record never decode as
//! another even though rates and accounts share one keyspace.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Discriminator stored in the `type` field of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    /// A partner's exchange rate.
    ExchangeRate,
    /// A user's latest cumulative balance snapshot.
    AccountTransaction,
}

/// A record that can be written to ledger state.
pub trait LedgerRecord: Serialize + DeserializeOwned {
    /// The tag this record type must carry.
    const DOC_TYPE: DocType;

    /// The tag carried by this instance.
    fn doc_type(&self) -> DocType;
}

/// Encode a record as JSON bytes.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` if the record cannot be serialized
/// (e.g. a non-finite float slipped past validation).
pub fn encode<T: LedgerRecord>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| LedgerError::InvalidInput(e.to_string()))
}

/// Decode JSON bytes read from `key` into a record, checking its tag.
///
/// # Errors
///
/// Returns `LedgerError::Corrupt` if the bytes are not a valid record of type `T`.
pub fn decode<T: LedgerRecord>(key: &str, bytes: &[u8]) -> Result<T> {
    let record: T = serde_json::from_slice(bytes).map_err(|e| LedgerError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;

    if record.doc_type() != T::DOC_TYPE {
        return Err(LedgerError::Corrupt {
            key: key.to_string(),
            reason: format!(
                "expected {:?} record, found {:?}",
                T::DOC_TYPE,
                record.doc_type()
            ),
        });
    }

    Ok(record)
}
