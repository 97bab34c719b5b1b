//! In-memory storage implementation.
//!
//! Used by tests, local demos, and the service's `memory` backend. State is
//! lost when the store is dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use m2o_core::KeyModification;

use crate::error::{Result, StoreError};
use crate::transaction::WriteSet;
use crate::{HistoryIter, Store};

/// In-memory store with per-key history.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    state: HashMap<String, Vec<u8>>,
    /// Shared so a reader can iterate without holding the lock. A commit
    /// that races an open iterator copies the list before appending.
    history: HashMap<String, Arc<Vec<KeyModification>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modifications recorded for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn history_len(&self, key: &str) -> Result<usize> {
        let state = self.read()?;
        Ok(state.history.get(key).map_or(0, |entries| entries.len()))
    }

    /// Number of keys that currently hold a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn key_count(&self) -> Result<usize> {
        Ok(self.read()?.state.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Database("memory store read lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.state.get(key).cloned())
    }

    fn history_for_key(&self, key: &str) -> Result<HistoryIter<'_>> {
        let Some(entries) = self.read()?.history.get(key).map(Arc::clone) else {
            return Ok(Box::new(std::iter::empty()));
        };
        Ok(Box::new((0..entries.len()).map(move |i| Ok(entries[i].clone()))))
    }

    fn commit(&self, write_set: &WriteSet) -> Result<()> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("memory store write lock poisoned".into()))?;

        for (key, value) in &write_set.writes {
            match value {
                Some(bytes) => {
                    state.state.insert(key.clone(), bytes.clone());
                }
                None => {
                    state.state.remove(key);
                }
            }

            Arc::make_mut(state.history.entry(key.clone()).or_default()).push(KeyModification {
                tx_id: write_set.tx_id,
                value: value.clone(),
                timestamp: write_set.timestamp,
            });
        }

        Ok(())
    }
}
