//! Conversion engine.
//!
//! Turns a user's partner points into M2O tokens and folds them into the
//! user's running total. Every argument is validated and every read is done
//! before the single write, so a failing conversion stages nothing.

use m2o_core::{
    parse_points, tokens_for, AccountRecord, ConversionEvent, ConversionReceipt, LedgerError,
    PartnerKey, Result, UserKey,
};
use m2o_store::StateContext;

use crate::{ledger, rates};

/// A validated `convertToM2OToken` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Converting user.
    pub user_id: UserKey,
    /// Partner whose points are converted.
    pub partner_name: PartnerKey,
    /// The user's identifier at the partner, lower-cased.
    pub partner_user_id: String,
    /// Points to convert.
    pub points: i64,
    /// Caller-supplied date, lower-cased.
    pub date: String,
}

impl ConversionRequest {
    /// Number of positional arguments on the invocation surface.
    pub const ARITY: usize = 5;

    /// Parse `[userId, partnerName, partnerUserId, pointsToConvert, date]`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` on a wrong argument count, an
    /// empty identifier, or a points value that is not a non-negative integer.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let [user_id, partner_name, partner_user_id, points, date] = args else {
            return Err(LedgerError::arity(Self::ARITY));
        };

        Ok(Self {
            user_id: UserKey::new(user_id.as_ref())?,
            partner_name: PartnerKey::new(partner_name.as_ref())?,
            partner_user_id: partner_user_id.as_ref().trim().to_lowercase(),
            points: parse_points(points.as_ref())?,
            date: date.as_ref().trim().to_lowercase(),
        })
    }
}

/// Convert points to tokens and persist the user's new record.
///
/// Zero points is a valid conversion: it awards nothing but still writes a
/// new version of the user's record.
///
/// # Errors
///
/// - `LedgerError::UnknownPartner` if the partner has no exchange rate.
/// - `LedgerError::Corrupt` if the rate or prior record cannot be decoded.
/// - `LedgerError::InvalidInput` if the token arithmetic overflows.
/// - `LedgerError::StoreUnavailable` if a read or the write fails.
pub fn convert<C>(ctx: &mut C, request: ConversionRequest) -> Result<ConversionReceipt>
where
    C: StateContext + ?Sized,
{
    tracing::debug!(
        user_id = %request.user_id,
        partner = %request.partner_name,
        points = request.points,
        "Starting conversion"
    );

    let rate = rates::find_rate(ctx, &request.partner_name)?.ok_or_else(|| {
        LedgerError::UnknownPartner {
            partner: request.partner_name.to_string(),
        }
    })?;

    let tokens_awarded = tokens_for(request.points, rate.rate)?;
    let prior = ledger::get_latest(ctx, &request.user_id)?;

    let record = AccountRecord::next(
        prior.as_ref(),
        ConversionEvent {
            user_id: request.user_id,
            partner_name: request.partner_name,
            partner_user_id: request.partner_user_id,
            date: request.date,
            points_converted: request.points,
            tokens_awarded,
            rate_applied: rate.rate,
        },
    )?;

    ledger::put_latest(ctx, &record)?;

    tracing::info!(
        tx_id = %ctx.tx_id(),
        user_id = %record.user_id,
        partner = %record.partner_name,
        tokens_awarded = record.tokens_awarded,
        cumulative_tokens = record.cumulative_tokens,
        "Conversion recorded"
    );

    Ok(ConversionReceipt::from(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2o_store::{MemoryStore, Transaction};

    fn request(user: &str, partner: &str, points: &str) -> ConversionRequest {
        ConversionRequest::from_args(&[user, partner, "P1", points, "2024-01-01"]).unwrap()
    }

    fn seed_rate(store: &MemoryStore, partner: &str, rate: f64) {
        let mut tx = Transaction::begin(store);
        rates::set_rate(&mut tx, &PartnerKey::new(partner).unwrap(), rate).unwrap();
        tx.commit().unwrap();
    }

    fn run(store: &MemoryStore, request: ConversionRequest) -> Result<ConversionReceipt> {
        let mut tx = Transaction::begin(store);
        let receipt = convert(&mut tx, request)?;
        tx.commit()?;
        Ok(receipt)
    }

    #[test]
    fn from_args_normalizes_fields() {
        let request = ConversionRequest::from_args(&[
            "IsHeeJong",
            "국민카드",
            "1111-AAAA",
            "2000",
            "2018-07-06 12:57:11",
        ])
        .unwrap();

        assert_eq!(request.user_id.as_str(), "isheejong");
        assert_eq!(request.partner_user_id, "1111-aaaa");
        assert_eq!(request.points, 2000);
    }

    #[test]
    fn from_args_checks_arity() {
        let err = ConversionRequest::from_args(&["u1", "a", "p1", "5"]).unwrap_err();
        assert_eq!(err, LedgerError::arity(5));
    }

    #[test]
    fn from_args_rejects_non_integer_points() {
        let err = ConversionRequest::from_args(&["u1", "a", "p1", "five", "d"]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn points_are_exact_up_to_two_pow_53() {
        let store = MemoryStore::new();
        seed_rate(&store, "a", 1.0);

        let receipt = run(&store, request("u1", "a", "9007199254740992")).unwrap();
        assert_eq!(receipt.tokens_awarded, 9_007_199_254_740_992);

        let err = ConversionRequest::from_args(&["u1", "a", "p1", "9007199254740993", "d"])
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(store.history_len("u1").unwrap(), 1);
    }

    #[test]
    fn conversions_accumulate() {
        let store = MemoryStore::new();
        seed_rate(&store, "partnerA", 10.0);

        let first = run(&store, request("u1", "partnerA", "5")).unwrap();
        assert_eq!(first.tokens_awarded, 50);
        assert_eq!(first.cumulative_tokens, 50);

        let second = run(&store, request("u1", "PARTNERA", "3")).unwrap();
        assert_eq!(second.tokens_awarded, 30);
        assert_eq!(second.cumulative_tokens, 80);
    }

    #[test]
    fn totals_span_partners() {
        let store = MemoryStore::new();
        seed_rate(&store, "a", 2.0);
        seed_rate(&store, "b", 0.5);

        run(&store, request("u1", "a", "10")).unwrap();
        let receipt = run(&store, request("u1", "b", "7")).unwrap();
        assert_eq!(receipt.tokens_awarded, 3);
        assert_eq!(receipt.cumulative_tokens, 23);
    }

    #[test]
    fn zero_points_records_noop_event() {
        let store = MemoryStore::new();
        seed_rate(&store, "a", 10.0);
        run(&store, request("u1", "a", "4")).unwrap();

        let receipt = run(&store, request("u1", "a", "0")).unwrap();
        assert_eq!(receipt.tokens_awarded, 0);
        assert_eq!(receipt.cumulative_tokens, 40);
        assert_eq!(store.history_len("u1").unwrap(), 2);
    }

    #[test]
    fn unknown_partner_fails_without_writing() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);

        let err = convert(&mut tx, request("u1", "ghost", "5")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownPartner {
                partner: "ghost".into()
            }
        );
        assert!(tx.write_set().is_empty());
    }

    #[test]
    fn corrupt_prior_record_aborts() {
        let store = MemoryStore::new();
        seed_rate(&store, "a", 1.0);
        let mut tx = Transaction::begin(&store);
        tx.put_state("u1", b"garbage".to_vec()).unwrap();
        tx.commit().unwrap();

        let mut tx = Transaction::begin(&store);
        let err = convert(&mut tx, request("u1", "a", "5")).unwrap_err();
        assert_eq!(err.code(), "corrupt_record");
        assert!(tx.write_set().is_empty());
    }
}
