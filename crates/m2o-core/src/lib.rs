//! Core types for the M2O token ledger.
//!
//! This crate provides the foundational types shared by the chaincode, the
//! state store, and the host service:
//!
//! - **Identifiers**: `UserKey`, `PartnerKey`, `TransactionId`
//! - **Rates**: `ExchangeRate`
//! - **Accounts**: `AccountRecord`, `ConversionEvent`, `BalanceView`, `ConversionReceipt`
//! - **History**: `KeyModification`, `HistoricalEntry`
//! - **Errors**: `LedgerError`
//!
//! # Token Unit
//!
//! Points are converted into whole M2O tokens: `tokens = floor(points * rate)`.
//! Token totals are stored as `i64` and only ever grow.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod error;
pub mod history;
pub mod ids;
pub mod rate;
pub mod record;

pub use account::{
    parse_points, tokens_for, AccountRecord, BalanceView, ConversionEvent, ConversionReceipt,
    MAX_POINTS,
};
pub use error::{LedgerError, Result};
pub use history::{HistoricalEntry, KeyModification};
pub use ids::{IdError, PartnerKey, TransactionId, UserKey};
pub use rate::{parse_rate, ExchangeRate};
pub use record::{DocType, LedgerRecord};
