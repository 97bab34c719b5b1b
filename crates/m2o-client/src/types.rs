//! Request and response types for the M2O client.

use serde::{Deserialize, Serialize};

use m2o_core::PartnerKey;

pub use m2o_core::{BalanceView, ConversionReceipt, HistoricalEntry};

/// Body of `POST /v1/invoke`.
#[derive(Debug, Clone, Serialize)]
pub struct InvokeRequest {
    /// Chaincode function name.
    pub function: String,
    /// Positional string arguments.
    pub args: Vec<String>,
}

/// Result of one invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResponse<T = serde_json::Value> {
    /// Transaction the invocation ran in.
    pub tx_id: String,
    /// Function result.
    pub payload: T,
}

/// Payload of `updateExchangeRate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdate {
    /// Normalized partner name.
    pub partner_name: PartnerKey,
    /// The stored rate.
    pub rate: f64,
}

/// A conversion to submit.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Converting user.
    pub user_id: String,
    /// Partner whose points are converted.
    pub partner_name: String,
    /// The user's identifier at the partner.
    pub partner_user_id: String,
    /// Points to convert.
    pub points: u64,
    /// Date of the conversion.
    pub date: String,
}

/// API error response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
