//! Client error types.

/// Errors that can occur when using the M2O client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error code this client does not know.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The service rejected the function name or its arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The user or partner has no record.
    #[error("not found: {0}")]
    NotFound(String),

    /// The partner has no exchange rate.
    #[error("unknown partner: {0}")]
    UnknownPartner(String),

    /// The ledger holds a record that cannot be decoded.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    /// The service's state store is down.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Missing or wrong API key.
    #[error("unauthorized")]
    Unauthorized,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Map an API error body to a typed error.
    pub(crate) fn from_api(code: &str, message: String, status: u16) -> Self {
        match code {
            "invalid_input" => Self::InvalidInput(message),
            "not_found" => Self::NotFound(message),
            "unknown_partner" => Self::UnknownPartner(message),
            "corrupt_record" => Self::CorruptRecord(message),
            "store_unavailable" => Self::StoreUnavailable(message),
            "unauthorized" => Self::Unauthorized,
            _ => Self::Api {
                code: code.to_string(),
                message,
                status,
            },
        }
    }
}
