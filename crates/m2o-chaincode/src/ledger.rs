//! Account ledger accessor.

use m2o_core::record::{decode, encode};
use m2o_core::{AccountRecord, Result, UserKey};
use m2o_store::StateContext;

/// Read a user's latest account record.
///
/// A user who has never converted has no record; that is `Ok(None)`.
///
/// # Errors
///
/// - `LedgerError::Corrupt` if the stored bytes are not an `AccountRecord`.
/// - `LedgerError::StoreUnavailable` if the read fails.
pub fn get_latest<C>(ctx: &C, user: &UserKey) -> Result<Option<AccountRecord>>
where
    C: StateContext + ?Sized,
{
    ctx.get_state(user.as_str())?
        .map(|bytes| decode(user.as_str(), &bytes))
        .transpose()
}

/// Overwrite a user's latest account record.
///
/// # Errors
///
/// Returns `LedgerError::StoreUnavailable` if the write cannot be staged.
pub fn put_latest<C>(ctx: &mut C, record: &AccountRecord) -> Result<()>
where
    C: StateContext + ?Sized,
{
    ctx.put_state(record.user_id.as_str(), encode(record)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2o_core::{ConversionEvent, PartnerKey};
    use m2o_store::{MemoryStore, Transaction};

    fn record(user: &str, tokens: i64) -> AccountRecord {
        AccountRecord::next(
            None,
            ConversionEvent {
                user_id: UserKey::new(user).unwrap(),
                partner_name: PartnerKey::new("partnera").unwrap(),
                partner_user_id: "p1".into(),
                date: "2024-01-01".into(),
                points_converted: tokens,
                tokens_awarded: tokens,
                rate_applied: 1.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn first_time_user_has_no_record() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store);
        assert_eq!(get_latest(&tx, &UserKey::new("u1").unwrap()), Ok(None));
    }

    #[test]
    fn put_then_get() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        put_latest(&mut tx, &record("u1", 50)).unwrap();
        tx.commit().unwrap();

        let tx = Transaction::begin(&store);
        let latest = get_latest(&tx, &UserKey::new("U1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(latest.cumulative_tokens, 50);
    }

    #[test]
    fn rate_record_under_user_key_is_corrupt() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        tx.put_state(
            "u1",
            br#"{"type":"ExchangeRate","partnerName":"u1","rate":1.0}"#.to_vec(),
        )
        .unwrap();
        tx.commit().unwrap();

        let tx = Transaction::begin(&store);
        let err = get_latest(&tx, &UserKey::new("u1").unwrap()).unwrap_err();
        assert_eq!(err.code(), "corrupt_record");
    }
}
