//! Point-to-token conversion chaincode.
//!
//! Converts loyalty points issued by partners into M2O tokens at a
//! per-partner exchange rate, keeps each user's running token total, and
//! replays a user's conversion history.
//!
//! # Architecture
//!
//! Every function takes an explicit [`StateContext`](m2o_store::StateContext)
//! and holds no state between invocations:
//!
//! - [`rates`]: exchange rate records, keyed by partner
//! - [`ledger`]: latest account record, keyed by user
//! - [`convert`]: the conversion engine
//! - [`query`]: balance lookup
//! - [`history`]: lazy replay of a user's record versions
//! - [`dispatch`]: name-based invocation used by the host
//!
//! # Example
//!
//! ```
//! use m2o_chaincode::M2oChaincode;
//! use m2o_store::{MemoryStore, Transaction};
//!
//! let store = MemoryStore::new();
//! let chaincode = M2oChaincode::new();
//!
//! let mut tx = Transaction::begin(&store);
//! chaincode.invoke(&mut tx, "updateExchangeRate", &["partnerA", "10.0"]).unwrap();
//! tx.commit().unwrap();
//!
//! let mut tx = Transaction::begin(&store);
//! let receipt = chaincode
//!     .invoke(&mut tx, "convertToM2OToken", &["u1", "partnerA", "p1", "5", "2024-01-01"])
//!     .unwrap();
//! tx.commit().unwrap();
//!
//! assert_eq!(receipt["cumulativeTokens"], 50);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod dispatch;
pub mod history;
pub mod ledger;
pub mod query;
pub mod rates;

pub use convert::{convert, ConversionRequest};
pub use dispatch::{M2oChaincode, Operation};
pub use history::{history, history_for_partner, History};
pub use query::query_total;
