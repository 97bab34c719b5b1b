//! Chaincode invocation handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use m2o_chaincode::Operation;
use m2o_store::Transaction;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Invocation request.
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    /// Chaincode function name, e.g. `convertToM2OToken`.
    pub function: String,
    /// Positional string arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Invocation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResponse {
    /// Transaction the invocation ran in.
    pub tx_id: String,
    /// Function result.
    pub payload: serde_json::Value,
}

/// Run one chaincode function in its own transaction.
///
/// Queries run under a shared lock and never commit. Writes hold the lock
/// exclusively and commit only if the function succeeds.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    body: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Json<InvokeResponse>, ApiError> {
    let Json(request) = body?;
    let op: Operation = request.function.parse()?;

    tracing::debug!(
        service = %auth.service_name,
        operation = %op,
        args = request.args.len(),
        "Received invocation"
    );

    if op.is_read_only() {
        let _guard = state.invoke_lock.read().await;
        let mut tx = Transaction::begin(state.store.as_ref());
        let tx_id = tx.write_set().tx_id;
        let payload = state.chaincode.invoke(&mut tx, op.name(), &request.args)?;
        return Ok(Json(InvokeResponse {
            tx_id: tx_id.to_string(),
            payload,
        }));
    }

    let _guard = state.invoke_lock.write().await;
    let mut tx = Transaction::begin(state.store.as_ref());
    let payload = state.chaincode.invoke(&mut tx, op.name(), &request.args)?;
    let tx_id = tx.commit()?;

    tracing::info!(tx_id = %tx_id, operation = %op, "Invocation committed");

    Ok(Json(InvokeResponse {
        tx_id: tx_id.to_string(),
        payload,
    }))
}
