//! Error types for the M2O ledger.

use crate::ids::IdError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
///
/// Every failure aborts the current invocation; nothing is retried locally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// Wrong argument count, or an argument that does not parse.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required key has never been written.
    #[error("not found: {key}")]
    NotFound {
        /// The state key that was looked up.
        key: String,
    },

    /// No exchange rate is registered for the partner.
    #[error("unknown partner: {partner}")]
    UnknownPartner {
        /// The normalized partner name.
        partner: String,
    },

    /// Stored bytes failed to decode as the expected record.
    #[error("corrupt record at {key}: {reason}")]
    Corrupt {
        /// The state key holding the bad bytes.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The underlying state store failed a read or write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::UnknownPartner { .. } => "unknown_partner",
            Self::Corrupt { .. } => "corrupt_record",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Shorthand for an argument-count failure.
    #[must_use]
    pub fn arity(expected: usize) -> Self {
        Self::InvalidInput(format!(
            "Incorrect number of arguments. Expecting {expected}"
        ))
    }
}

impl From<IdError> for LedgerError {
    fn from(err: IdError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errors = [
            LedgerError::InvalidInput(String::new()),
            LedgerError::NotFound { key: "k".into() },
            LedgerError::UnknownPartner {
                partner: "p".into(),
            },
            LedgerError::Corrupt {
                key: "k".into(),
                reason: "r".into(),
            },
            LedgerError::StoreUnavailable(String::new()),
        ];
        let mut codes: Vec<_> = errors.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn arity_message_matches_wire_text() {
        assert_eq!(
            LedgerError::arity(5).to_string(),
            "invalid input: Incorrect number of arguments. Expecting 5"
        );
    }

    #[test]
    fn id_errors_become_invalid_input() {
        let err: LedgerError = IdError::Empty { kind: "user id" }.into();
        assert_eq!(err.code(), "invalid_input");
    }
}
