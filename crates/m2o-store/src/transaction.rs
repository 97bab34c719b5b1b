//! Per-invocation transaction context.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use m2o_core::TransactionId;

use crate::error::{Result, StoreError};
use crate::{HistoryIter, StateContext, Store};

/// The writes staged by one transaction.
///
/// A later write to the same key replaces an earlier one; `None` stages a
/// delete. Keys are kept sorted so commits are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    /// Transaction the writes belong to.
    pub tx_id: TransactionId,
    /// Host-assigned transaction timestamp.
    pub timestamp: DateTime<Utc>,
    /// Staged writes by key.
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl WriteSet {
    /// Create an empty write set.
    #[must_use]
    pub fn new(tx_id: TransactionId, timestamp: DateTime<Utc>) -> Self {
        Self {
            tx_id,
            timestamp,
            writes: BTreeMap::new(),
        }
    }

    /// Whether nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// One invocation's view of a [`Store`].
///
/// Reads see committed state only. Writes are buffered and applied by
/// [`Transaction::commit`]; a transaction that is dropped without
/// committing leaves the store untouched.
pub struct Transaction<'s> {
    store: &'s dyn Store,
    write_set: WriteSet,
}

impl<'s> Transaction<'s> {
    /// Start a transaction with a fresh ID and the current time.
    #[must_use]
    pub fn begin(store: &'s dyn Store) -> Self {
        Self::with_id(store, TransactionId::generate(), Utc::now())
    }

    /// Start a transaction with an explicit ID and timestamp.
    #[must_use]
    pub fn with_id(store: &'s dyn Store, tx_id: TransactionId, timestamp: DateTime<Utc>) -> Self {
        Self {
            store,
            write_set: WriteSet::new(tx_id, timestamp),
        }
    }

    /// The writes staged so far.
    #[must_use]
    pub fn write_set(&self) -> &WriteSet {
        &self.write_set
    }

    /// Apply the staged writes to the store.
    ///
    /// A transaction that staged nothing commits without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write set; nothing is applied.
    pub fn commit(self) -> Result<TransactionId> {
        let tx_id = self.write_set.tx_id;
        if self.write_set.is_empty() {
            tracing::debug!(tx_id = %tx_id, "Read-only transaction, nothing to commit");
            return Ok(tx_id);
        }

        self.store.commit(&self.write_set)?;
        tracing::info!(
            tx_id = %tx_id,
            keys = self.write_set.writes.len(),
            "Transaction committed"
        );
        Ok(tx_id)
    }

    fn stage(&mut self, key: &str, value: Option<Vec<u8>>) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.write_set.writes.insert(key.to_string(), value);
        Ok(())
    }
}

impl StateContext for Transaction<'_> {
    fn tx_id(&self) -> TransactionId {
        self.write_set.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.stage(key, Some(value))
    }

    fn del_state(&mut self, key: &str) -> Result<()> {
        self.stage(key, None)
    }

    fn history_for_key(&self, key: &str) -> Result<HistoryIter<'_>> {
        self.store.history_for_key(key)
    }
}
