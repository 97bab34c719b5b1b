//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Every commit takes the next value of a persistent sequence counter; each
//! written key gets one history entry under that sequence number, so a key's
//! history iterates in commit order.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use m2o_core::KeyModification;

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::transaction::WriteSet;
use crate::{HistoryIter, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Next commit sequence number. Held for the whole commit so sequence
    /// numbers are unique and history order matches commit order.
    next_seq: Mutex<u64>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let store = Self {
            db: Arc::new(db),
            next_seq: Mutex::new(0),
        };

        let next = store.load_next_seq()?;
        *store.lock_seq()? = next;
        tracing::debug!(next_seq = next, "RocksDB store opened");

        Ok(store)
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock_seq(&self) -> Result<std::sync::MutexGuard<'_, u64>> {
        self.next_seq
            .lock()
            .map_err(|_| StoreError::Database("commit sequence lock poisoned".into()))
    }

    fn load_next_seq(&self) -> Result<u64> {
        let cf = self.cf(cf::META)?;
        let stored = self
            .db
            .get_cf(&cf, keys::COMMIT_SEQ_KEY)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match stored {
            None => Ok(0),
            Some(bytes) => keys::decode_seq(&bytes)
                .ok_or_else(|| StoreError::Serialization("malformed commit sequence".into())),
        }
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl Store for RocksStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(cf::STATE)?;
        self.db
            .get_cf(&cf, keys::state_key(key))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn history_for_key(&self, key: &str) -> Result<HistoryIter<'_>> {
        let cf = self.cf(cf::HISTORY)?;
        let prefix = keys::history_prefix(key);

        let raw = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let iter = raw
            .map(|item| item.map_err(|e| StoreError::Database(e.to_string())))
            .take_while(move |item| match item {
                Ok((k, _)) => k.starts_with(&prefix),
                Err(_) => true,
            })
            .map(|item| item.and_then(|(_, value)| Self::deserialize::<KeyModification>(&value)));

        Ok(Box::new(iter))
    }

    fn commit(&self, write_set: &WriteSet) -> Result<()> {
        let cf_state = self.cf(cf::STATE)?;
        let cf_history = self.cf(cf::HISTORY)?;
        let cf_meta = self.cf(cf::META)?;

        let mut next_seq = self.lock_seq()?;
        let seq = *next_seq;

        let mut batch = WriteBatch::default();
        for (key, value) in &write_set.writes {
            let state_key = keys::state_key(key);
            match value {
                Some(bytes) => batch.put_cf(&cf_state, &state_key, bytes),
                None => batch.delete_cf(&cf_state, &state_key),
            }

            let modification = KeyModification {
                tx_id: write_set.tx_id,
                value: value.clone(),
                timestamp: write_set.timestamp,
            };
            batch.put_cf(
                &cf_history,
                keys::history_key(key, seq),
                Self::serialize(&modification)?,
            );
        }
        batch.put_cf(&cf_meta, keys::COMMIT_SEQ_KEY, (seq + 1).to_be_bytes());

        // Write atomically
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        *next_seq = seq + 1;
        Ok(())
    }
}
