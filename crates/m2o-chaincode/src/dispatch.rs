//! Invocation dispatch.
//!
//! The host hands the chaincode a function name and positional string
//! arguments. [`Operation`] is the closed table of supported names;
//! [`M2oChaincode::invoke`] validates the call against it and forwards typed
//! arguments to the matching handler.

use std::fmt;
use std::str::FromStr;

use m2o_core::{parse_rate, HistoricalEntry, LedgerError, PartnerKey, Result, UserKey};
use m2o_store::StateContext;
use serde::Serialize;
use serde_json::Value;

use crate::convert::{convert, ConversionRequest};
use crate::history::{history, history_for_partner};
use crate::query::query_total;
use crate::rates::set_rate;

/// A chaincode function exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `updateExchangeRate(partnerName, rate)`
    UpdateExchangeRate,
    /// `convertToM2OToken(userId, partnerName, partnerUserId, pointsToConvert, date)`
    ConvertToM2OToken,
    /// `queryUserTotal(userId)`
    QueryUserTotal,
    /// `queryUserTransactionsForAll(userId)`
    QueryUserTransactionsForAll,
    /// `queryUserTransactionsForPartner(userId, partnerName)`
    QueryUserTransactionsForPartner,
}

impl Operation {
    /// Every registered operation.
    pub const ALL: [Self; 5] = [
        Self::UpdateExchangeRate,
        Self::ConvertToM2OToken,
        Self::QueryUserTotal,
        Self::QueryUserTransactionsForAll,
        Self::QueryUserTransactionsForPartner,
    ];

    /// The function name used on the invocation surface.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpdateExchangeRate => "updateExchangeRate",
            Self::ConvertToM2OToken => "convertToM2OToken",
            Self::QueryUserTotal => "queryUserTotal",
            Self::QueryUserTransactionsForAll => "queryUserTransactionsForAll",
            Self::QueryUserTransactionsForPartner => "queryUserTransactionsForPartner",
        }
    }

    /// Number of positional arguments the operation takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::UpdateExchangeRate | Self::QueryUserTransactionsForPartner => 2,
            Self::ConvertToM2OToken => ConversionRequest::ARITY,
            Self::QueryUserTotal | Self::QueryUserTransactionsForAll => 1,
        }
    }

    /// Whether the operation never stages writes.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        !matches!(self, Self::UpdateExchangeRate | Self::ConvertToM2OToken)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| {
                LedgerError::InvalidInput(format!("Received unknown function invocation: {s}"))
            })
    }
}

/// Success payload for write operations.
#[derive(Serialize)]
struct Success<T> {
    #[serde(rename = "Message")]
    message: &'static str,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateUpdated {
    partner_name: PartnerKey,
    rate: f64,
}

fn success<T: Serialize>(body: T) -> Result<Value> {
    to_payload(&Success {
        message: "Success",
        body,
    })
}

fn to_payload<T: Serialize + ?Sized>(body: &T) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| LedgerError::InvalidInput(format!("failed to encode payload: {e}")))
}

/// The M2O point conversion chaincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct M2oChaincode;

impl M2oChaincode {
    /// Create the chaincode.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Instantiate the chaincode. There is no state to seed.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches [`Self::invoke`].
    pub fn init<C>(&self, ctx: &mut C) -> Result<Value>
    where
        C: StateContext + ?Sized,
    {
        tracing::debug!(tx_id = %ctx.tx_id(), "Chaincode initialized");
        Ok(Value::Null)
    }

    /// Run one named function with positional arguments.
    ///
    /// Writes are staged on `ctx`; the caller commits them only when this
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidInput` for an unknown function, a wrong
    ///   argument count, or an argument that does not parse.
    /// - Any error from the selected handler.
    pub fn invoke<C, S>(&self, ctx: &mut C, function: &str, args: &[S]) -> Result<Value>
    where
        C: StateContext + ?Sized,
        S: AsRef<str>,
    {
        let op: Operation = function.parse()?;
        if args.len() != op.arity() {
            return Err(LedgerError::arity(op.arity()));
        }

        tracing::debug!(tx_id = %ctx.tx_id(), operation = %op, "Invoking chaincode");

        match op {
            Operation::UpdateExchangeRate => {
                let partner = PartnerKey::new(args[0].as_ref())?;
                let rate = parse_rate(args[1].as_ref())?;
                let record = set_rate(ctx, &partner, rate)?;
                success(RateUpdated {
                    partner_name: record.partner_name,
                    rate: record.rate,
                })
            }
            Operation::ConvertToM2OToken => {
                let request = ConversionRequest::from_args(args)?;
                success(convert(ctx, request)?)
            }
            Operation::QueryUserTotal => {
                let user = UserKey::new(args[0].as_ref())?;
                to_payload(&query_total(&*ctx, &user)?)
            }
            Operation::QueryUserTransactionsForAll => {
                let user = UserKey::new(args[0].as_ref())?;
                let entries = history(&*ctx, &user)?.collect::<Result<Vec<HistoricalEntry>>>()?;
                to_payload(&entries)
            }
            Operation::QueryUserTransactionsForPartner => {
                let user = UserKey::new(args[0].as_ref())?;
                let partner = PartnerKey::new(args[1].as_ref())?;
                let entries = history_for_partner(&*ctx, &user, &partner)?
                    .collect::<Result<Vec<HistoricalEntry>>>()?;
                to_payload(&entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2o_store::{MemoryStore, Transaction};
    use std::collections::HashSet;

    fn call(store: &MemoryStore, function: &str, args: &[&str]) -> Result<Value> {
        let mut tx = Transaction::begin(store);
        let payload = M2oChaincode::new().invoke(&mut tx, function, args)?;
        tx.commit()?;
        Ok(payload)
    }

    #[test]
    fn registration_table_is_consistent() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());

        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
            assert!(op.arity() >= 1);
        }
        assert!(!Operation::ConvertToM2OToken.is_read_only());
        assert!(Operation::QueryUserTotal.is_read_only());
    }

    #[test]
    fn unknown_function_is_rejected() {
        let store = MemoryStore::new();
        let err = call(&store, "deleteEverything", &[]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(err.to_string().contains("unknown function"));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("QueryUserTotal".parse::<Operation>().is_err());
    }

    #[test]
    fn wrong_arity_is_rejected_before_any_read() {
        let store = MemoryStore::new();
        let err = call(&store, "updateExchangeRate", &["partnerA"]).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidInput("Incorrect number of arguments. Expecting 2".into())
        );
    }

    #[test]
    fn non_numeric_rate_is_rejected() {
        let store = MemoryStore::new();
        let err = call(&store, "updateExchangeRate", &["partnerA", "ten"]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(store.key_count().unwrap(), 0);
    }

    #[test]
    fn worked_example_end_to_end() {
        let store = MemoryStore::new();

        let payload = call(&store, "updateExchangeRate", &["partnerA", "10.0"]).unwrap();
        assert_eq!(payload["Message"], "Success");
        assert_eq!(payload["partnerName"], "partnera");

        let first = call(
            &store,
            "convertToM2OToken",
            &["u1", "partnerA", "P1", "5", "2024-01-01"],
        )
        .unwrap();
        assert_eq!(first["Message"], "Success");
        assert_eq!(first["tokensAwarded"], 50);
        assert_eq!(first["cumulativeTokens"], 50);

        let second = call(
            &store,
            "convertToM2OToken",
            &["u1", "partnerA", "P1", "3", "2024-01-02"],
        )
        .unwrap();
        assert_eq!(second["tokensAwarded"], 30);
        assert_eq!(second["cumulativeTokens"], 80);

        let total = call(&store, "queryUserTotal", &["U1"]).unwrap();
        assert_eq!(
            total,
            serde_json::json!({ "userId": "u1", "cumulativeTokens": 80 })
        );

        let history = call(&store, "queryUserTransactionsForAll", &["u1"]).unwrap();
        let totals: Vec<_> = history
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["value"]["cumulativeTokens"].as_i64().unwrap())
            .collect();
        assert_eq!(totals, vec![50, 80]);
    }

    #[test]
    fn partner_history_filters_by_partner() {
        let store = MemoryStore::new();
        call(&store, "updateExchangeRate", &["a", "1"]).unwrap();
        call(&store, "updateExchangeRate", &["b", "2"]).unwrap();
        call(&store, "convertToM2OToken", &["u1", "a", "x", "1", "d"]).unwrap();
        call(&store, "convertToM2OToken", &["u1", "b", "y", "1", "d"]).unwrap();

        let entries = call(&store, "queryUserTransactionsForPartner", &["u1", "B"]).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["value"]["partnerName"], "b");
        assert_eq!(entries[0]["isDelete"], false);
    }

    #[test]
    fn query_of_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = call(&store, "queryUserTotal", &["nobody"]).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn init_is_a_noop() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        assert_eq!(M2oChaincode::new().init(&mut tx), Ok(Value::Null));
        assert!(tx.write_set().is_empty());
    }
}
