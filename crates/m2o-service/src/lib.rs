//! M2O ledger HTTP host.
//!
//! Runs the point conversion chaincode behind a small JSON API:
//!
//! - `GET /health`
//! - `POST /v1/invoke` with `{"function": "...", "args": ["..."]}`
//!
//! Each invocation runs in its own transaction against the configured
//! state store. Writes are committed only when the chaincode function
//! succeeds.
//!
//! # Authentication
//!
//! When `SERVICE_API_KEY` is set, invocations must carry it in the
//! `x-api-key` header.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ServiceConfig, StorageBackend};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{open_store, AppState};
