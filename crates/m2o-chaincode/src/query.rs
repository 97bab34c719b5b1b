//! Balance query.

use m2o_core::{BalanceView, LedgerError, Result, UserKey};
use m2o_store::StateContext;

use crate::ledger;

/// Read a user's running token total.
///
/// # Errors
///
/// - `LedgerError::NotFound` if the user has never converted.
/// - `LedgerError::Corrupt` if the stored record cannot be decoded.
/// - `LedgerError::StoreUnavailable` if the read fails.
pub fn query_total<C>(ctx: &C, user: &UserKey) -> Result<BalanceView>
where
    C: StateContext + ?Sized,
{
    ledger::get_latest(ctx, user)?
        .map(|record| record.balance())
        .ok_or_else(|| LedgerError::NotFound {
            key: user.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{convert, ConversionRequest};
    use crate::rates;
    use m2o_core::PartnerKey;
    use m2o_store::{MemoryStore, Transaction};

    #[test]
    fn unknown_user_is_not_found_not_zero() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store);
        let err = query_total(&tx, &UserKey::new("u1").unwrap()).unwrap_err();
        assert_eq!(err, LedgerError::NotFound { key: "u1".into() });
    }

    #[test]
    fn returns_latest_total() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        rates::set_rate(&mut tx, &PartnerKey::new("a").unwrap(), 3.0).unwrap();
        tx.commit().unwrap();

        let mut tx = Transaction::begin(&store);
        let request = ConversionRequest::from_args(&["U1", "a", "p", "7", "d"]).unwrap();
        convert(&mut tx, request).unwrap();
        tx.commit().unwrap();

        let tx = Transaction::begin(&store);
        let view = query_total(&tx, &UserKey::new("u1").unwrap()).unwrap();
        assert_eq!(view.cumulative_tokens, 21);
        assert_eq!(view.user_id.as_str(), "u1");
    }
}
