//! Versioned state store for the M2O ledger.
//!
//! This crate plays the part of the ledger runtime for local use: it keeps
//! the current value of every key together with the ordered list of
//! modifications that produced it, and hands chaincode a per-invocation
//! [`Transaction`] context.
//!
//! # Architecture
//!
//! - [`Store`]: committed state plus per-key history. Implemented by
//!   [`MemoryStore`] and, with the `rocksdb-backend` feature, `RocksStore`.
//! - [`StateContext`]: what chaincode sees during one invocation: reads of
//!   committed state, buffered writes, and key history.
//! - [`Transaction`]: the `StateContext` implementation. Writes are only
//!   applied when [`Transaction::commit`] succeeds; dropping a transaction
//!   discards them.
//!
//! # Example
//!
//! ```
//! use m2o_store::{MemoryStore, StateContext, Transaction};
//!
//! let store = MemoryStore::new();
//!
//! let mut tx = Transaction::begin(&store);
//! tx.put_state("u1", b"{}".to_vec()).unwrap();
//! tx.commit().unwrap();
//!
//! assert_eq!(store.history_len("u1").unwrap(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;
pub mod transaction;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;
pub use transaction::{Transaction, WriteSet};

use m2o_core::{KeyModification, TransactionId};

/// Lazily produced history of one key, oldest modification first.
pub type HistoryIter<'a> = Box<dyn Iterator<Item = Result<KeyModification>> + 'a>;

/// The storage trait defining committed state and key history.
///
/// Implementations must apply a [`WriteSet`] atomically: either every write
/// and its history entry becomes visible, or none does.
pub trait Store: Send + Sync {
    /// Read the committed value of a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Iterate over every committed modification of a key, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be opened. Failures while
    /// iterating are yielded as `Err` items.
    fn history_for_key(&self, key: &str) -> Result<HistoryIter<'_>>;

    /// Apply a transaction's writes and append their history entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; nothing is applied.
    fn commit(&self, write_set: &WriteSet) -> Result<()>;
}

/// The per-invocation view of ledger state handed to chaincode.
pub trait StateContext {
    /// Identifier of the running transaction.
    fn tx_id(&self) -> TransactionId;

    /// Read the committed value of a key.
    ///
    /// Writes made earlier in the same transaction are not visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stage a write of `value` to `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` for an empty key.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stage a delete of `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` for an empty key.
    fn del_state(&mut self, key: &str) -> Result<()>;

    /// Iterate over the committed history of a key, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn history_for_key(&self, key: &str) -> Result<HistoryIter<'_>>;
}
