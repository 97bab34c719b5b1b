//! M2O Ledger Client SDK.
//!
//! This crate provides a client library for services that convert partner
//! points into M2O tokens through the ledger service.
//!
//! # Example
//!
//! ```no_run
//! use m2o_client::{ClientOptions, ConvertRequest, M2oClient};
//!
//! # async fn example() -> Result<(), m2o_client::ClientError> {
//! let client = M2oClient::with_options(
//!     "http://m2o-ledger:8080",
//!     ClientOptions::with_api_key("your-service-api-key"),
//! )?;
//!
//! client.update_exchange_rate("partnerA", 10.0).await?;
//!
//! let receipt = client
//!     .convert(&ConvertRequest {
//!         user_id: "u1".to_string(),
//!         partner_name: "partnerA".to_string(),
//!         partner_user_id: "p-1".to_string(),
//!         points: 5,
//!         date: "2024-01-01".to_string(),
//!     })
//!     .await?;
//!
//! println!("New total: {} tokens", receipt.cumulative_tokens);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, M2oClient};
pub use error::ClientError;
pub use types::*;
