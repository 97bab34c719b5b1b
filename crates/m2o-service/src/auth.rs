//! Service authentication via API key.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the service API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// A caller allowed to invoke the chaincode.
///
/// When `SERVICE_API_KEY` is configured the `x-api-key` header must match it;
/// otherwise every caller is accepted.
#[derive(Debug, Clone)]
pub struct ServiceAuth {
    /// The caller's name from `x-service-name`, or "unknown".
    pub service_name: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ServiceAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(expected_key) = state.config.service_api_key.as_ref() {
            let api_key = parts
                .headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            if api_key != expected_key {
                tracing::debug!("Rejected invocation with wrong API key");
                return Err(ApiError::Unauthorized);
            }
        }

        let service_name = parts
            .headers
            .get("x-service-name")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self { service_name })
    }
}
