//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Current committed value of every key.
    pub const STATE: &str = "state";

    /// Key modifications, keyed by `len || key || commit_seq`.
    /// Value is a CBOR-encoded `KeyModification`.
    pub const HISTORY: &str = "history";

    /// Store bookkeeping such as the next commit sequence number.
    pub const META: &str = "meta";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::STATE, cf::HISTORY, cf::META]
}
