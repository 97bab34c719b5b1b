//! Identifier types for the M2O ledger.
//!
//! This module provides strongly-typed identifiers for users, partners, and transactions.
//!
//! # Normalized Keys
//!
//! The `ledger_key_type!` macro defines identifiers that double as state keys.
//! Construction trims surrounding whitespace and lower-cases the input, so
//! `"PartnerA"` and `" partnera "` address the same record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Macro to define a case-insensitive key type with standard trait implementations.
///
/// This macro generates a newtype wrapper around a normalized `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `Serialize`, `Deserialize` (as string, normalized on the way in)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`, `AsRef<str>`
macro_rules! ledger_key_type {
    ($name:ident, $label:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Normalize raw input into a key.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the input is empty after trimming.
            pub fn new(raw: &str) -> Result<Self, IdError> {
                let normalized = raw.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(IdError::Empty { kind: $label });
                }
                Ok(Self(normalized))
            }

            /// Return the normalized key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

ledger_key_type!(
    UserKey,
    "user id",
    "A user identifier, normalized to lower case.\n\nThe normalized form is the state key of the user's `AccountRecord`."
);
ledger_key_type!(
    PartnerKey,
    "partner name",
    "A partner name, normalized to lower case.\n\nThe normalized form is the state key of the partner's `ExchangeRate`."
);

/// A transaction identifier using ULID for time-ordering.
///
/// The host assigns one per invocation; every write committed by that
/// invocation carries it in the key's history.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Ulid);

impl TransactionId {
    /// Generate a new `TransactionId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty or whitespace only.
    #[error("{kind} must not be empty")]
    Empty {
        /// What kind of identifier was being parsed.
        kind: &'static str,
    },

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}
