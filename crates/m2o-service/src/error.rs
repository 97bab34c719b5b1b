//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use m2o_core::LedgerError;
use m2o_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or wrong API key.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - unknown function, wrong arity, or unparseable argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required key has never been written.
    #[error("not found: {0}")]
    NotFound(String),

    /// No exchange rate for the partner.
    #[error("unknown partner: {0}")]
    UnknownPartner(String),

    /// Stored bytes failed to decode.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The state store failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::UnknownPartner(partner) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unknown_partner",
                format!("No exchange rate registered for partner {partner}"),
            ),
            Self::Corrupt(msg) => {
                tracing::error!(error = %msg, "Corrupt ledger record");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "corrupt_record",
                    msg.clone(),
                )
            }
            Self::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "State store failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "The state store is unavailable".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidInput(msg) => Self::InvalidInput(msg),
            LedgerError::NotFound { key } => Self::NotFound(format!("No record for {key}")),
            LedgerError::UnknownPartner { partner } => Self::UnknownPartner(partner),
            err @ LedgerError::Corrupt { .. } => Self::Corrupt(err.to_string()),
            LedgerError::StoreUnavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        LedgerError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_to_status_codes() {
        let cases = [
            (LedgerError::arity(1), StatusCode::BAD_REQUEST),
            (
                LedgerError::NotFound { key: "u1".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                LedgerError::UnknownPartner {
                    partner: "p".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                LedgerError::Corrupt {
                    key: "u1".into(),
                    reason: "eof".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LedgerError::StoreUnavailable("disk".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn store_errors_are_unavailable() {
        let err = ApiError::from(StoreError::Database("io".into()));
        assert!(matches!(err, ApiError::StoreUnavailable(_)));
    }
}
