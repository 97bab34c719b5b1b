//! Rate store accessor.
//!
//! A partner's exchange rate lives under the partner's normalized name.

use m2o_core::record::{decode, encode};
use m2o_core::{ExchangeRate, LedgerError, PartnerKey, Result};
use m2o_store::StateContext;

/// Write a partner's exchange rate, replacing any previous value.
///
/// There is no read before the write; the last writer wins.
///
/// # Errors
///
/// - `LedgerError::InvalidInput` if `rate` is not a positive finite number.
/// - `LedgerError::StoreUnavailable` if the write cannot be staged.
pub fn set_rate<C>(ctx: &mut C, partner: &PartnerKey, rate: f64) -> Result<ExchangeRate>
where
    C: StateContext + ?Sized,
{
    let record = ExchangeRate::new(partner.clone(), rate)?;
    ctx.put_state(partner.as_str(), encode(&record)?)?;

    tracing::info!(partner = %partner, rate, "Exchange rate updated");
    Ok(record)
}

/// Read a partner's exchange rate, if one has been written.
///
/// # Errors
///
/// - `LedgerError::Corrupt` if the stored bytes are not an `ExchangeRate`.
/// - `LedgerError::StoreUnavailable` if the read fails.
pub fn find_rate<C>(ctx: &C, partner: &PartnerKey) -> Result<Option<ExchangeRate>>
where
    C: StateContext + ?Sized,
{
    ctx.get_state(partner.as_str())?
        .map(|bytes| decode(partner.as_str(), &bytes))
        .transpose()
}

/// Read a partner's exchange rate.
///
/// # Errors
///
/// - `LedgerError::NotFound` if the partner has never had a rate.
/// - `LedgerError::Corrupt` if the stored bytes are not an `ExchangeRate`.
/// - `LedgerError::StoreUnavailable` if the read fails.
pub fn get_rate<C>(ctx: &C, partner: &PartnerKey) -> Result<ExchangeRate>
where
    C: StateContext + ?Sized,
{
    find_rate(ctx, partner)?.ok_or_else(|| LedgerError::NotFound {
        key: partner.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2o_store::{MemoryStore, Transaction};

    fn partner(name: &str) -> PartnerKey {
        PartnerKey::new(name).unwrap()
    }

    #[test]
    fn get_after_set_returns_rate() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        set_rate(&mut tx, &partner("PartnerA"), 10.0).unwrap();
        tx.commit().unwrap();

        let tx = Transaction::begin(&store);
        let rate = get_rate(&tx, &partner("partnera")).unwrap();
        assert!((rate.rate - 10.0).abs() < f64::EPSILON);
        assert_eq!(rate.partner_name.as_str(), "partnera");
    }

    #[test]
    fn later_set_replaces_rate() {
        let store = MemoryStore::new();
        for value in [10.0, 2.5] {
            let mut tx = Transaction::begin(&store);
            set_rate(&mut tx, &partner("partnerA"), value).unwrap();
            tx.commit().unwrap();
        }

        let tx = Transaction::begin(&store);
        let rate = get_rate(&tx, &partner("PARTNERA")).unwrap();
        assert!((rate.rate - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_rate_is_not_found() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store);
        assert_eq!(
            get_rate(&tx, &partner("nobody")),
            Err(LedgerError::NotFound {
                key: "nobody".into()
            })
        );
        assert_eq!(find_rate(&tx, &partner("nobody")), Ok(None));
    }

    #[test]
    fn undecodable_rate_is_corrupt() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        tx.put_state("partnera", b"10.0".to_vec()).unwrap();
        tx.commit().unwrap();

        let tx = Transaction::begin(&store);
        assert_eq!(
            get_rate(&tx, &partner("partnera")).unwrap_err().code(),
            "corrupt_record"
        );
    }

    #[test]
    fn invalid_rate_stages_nothing() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);
        assert!(set_rate(&mut tx, &partner("a"), -1.0).is_err());
        assert!(tx.write_set().is_empty());
    }
}
