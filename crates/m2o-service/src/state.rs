//! Application state.

use std::sync::Arc;

use m2o_chaincode::M2oChaincode;
use m2o_store::{MemoryStore, Store, StoreError};
use tokio::sync::RwLock;

use crate::config::{ServiceConfig, StorageBackend};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// The chaincode every invocation is routed to.
    pub chaincode: M2oChaincode,

    /// Orders invocations: queries share it, writes hold it exclusively.
    pub invoke_lock: Arc<RwLock<()>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        if config.service_api_key.is_none() {
            tracing::warn!("SERVICE_API_KEY not set - invocations are unauthenticated");
        }

        Self {
            store,
            config,
            chaincode: M2oChaincode::new(),
            invoke_lock: Arc::new(RwLock::new(())),
        }
    }
}

/// Open the storage backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if `RocksDB` cannot be opened, or if it was selected in
/// a build without the `rocksdb-backend` feature.
pub fn open_store(config: &ServiceConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store - state is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "rocksdb-backend")]
        StorageBackend::RocksDb => {
            tracing::info!(path = %config.data_dir, "Opening RocksDB store");
            Ok(Arc::new(m2o_store::RocksStore::open(&config.data_dir)?))
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        StorageBackend::RocksDb => Err(StoreError::Database(
            "built without the rocksdb-backend feature".into(),
        )),
    }
}
