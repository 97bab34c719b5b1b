//! Common test utilities for m2o-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use m2o_service::{create_router, AppState, ServiceConfig, StorageBackend};
use m2o_store::MemoryStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for inspecting committed state.
    pub store: Arc<MemoryStore>,
    /// The service API key required on invocations.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_api_key(Some("test-service-key"))
    }

    /// Create a harness; `None` leaves invocations unauthenticated.
    pub fn with_api_key(api_key: Option<&str>) -> Self {
        let store = Arc::new(MemoryStore::new());

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            storage_backend: StorageBackend::Memory,
            service_api_key: api_key.map(String::from),
            ..ServiceConfig::default()
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            service_api_key: api_key.unwrap_or_default().to_string(),
        }
    }

    /// Invoke a chaincode function with the harness API key.
    pub async fn invoke(&self, function: &str, args: &[&str]) -> TestResponse {
        self.server
            .post("/v1/invoke")
            .add_header("x-api-key", self.service_api_key.clone())
            .json(&json!({ "function": function, "args": args }))
            .await
    }

    /// Invoke and return the payload, asserting success.
    pub async fn invoke_ok(&self, function: &str, args: &[&str]) -> Value {
        let response = self.invoke(function, args).await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["payload"].clone()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
