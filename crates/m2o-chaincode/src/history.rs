//! History replay.
//!
//! Projects the store's modification log for a user key into
//! `HistoricalEntry` values, oldest first. The projection is lazy: entries
//! are decoded as the caller pulls them, and one bad value never stops the
//! scan. A store failure mid-scan is yielded once and ends the iteration.

use m2o_core::{HistoricalEntry, LedgerError, PartnerKey, Result, UserKey};
use m2o_store::{HistoryIter, StateContext};

/// Lazy iterator over a user's historical entries.
pub struct History<'a> {
    key: String,
    inner: Option<HistoryIter<'a>>,
}

impl Iterator for History<'_> {
    type Item = Result<HistoricalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next()?;
        match item {
            Ok(modification) => {
                let entry = HistoricalEntry::from_modification(modification);
                if entry.undecodable {
                    tracing::warn!(
                        key = %self.key,
                        tx_id = %entry.transaction_id,
                        "History entry is not JSON, returning raw bytes"
                    );
                }
                Some(Ok(entry))
            }
            Err(err) => {
                self.inner = None;
                Some(Err(LedgerError::from(err)))
            }
        }
    }
}

/// Replay a user's write history.
///
/// Calling this again re-reads the store, so the sequence is restartable
/// and reflects any writes committed in between.
///
/// # Errors
///
/// Returns `LedgerError::StoreUnavailable` if the history cannot be opened.
pub fn history<'c, C>(ctx: &'c C, user: &UserKey) -> Result<History<'c>>
where
    C: StateContext + ?Sized,
{
    let inner = ctx.history_for_key(user.as_str())?;
    Ok(History {
        key: user.to_string(),
        inner: Some(inner),
    })
}

/// Replay a user's history, keeping only conversions with one partner.
///
/// Deletes and undecodable entries carry no partner and are skipped; store
/// errors are passed through.
///
/// # Errors
///
/// Returns `LedgerError::StoreUnavailable` if the history cannot be opened.
pub fn history_for_partner<'c, C>(
    ctx: &'c C,
    user: &UserKey,
    partner: &PartnerKey,
) -> Result<impl Iterator<Item = Result<HistoricalEntry>> + 'c>
where
    C: StateContext + ?Sized,
{
    let partner = partner.clone();
    Ok(history(ctx, user)?.filter(move |item| match item {
        Ok(entry) => entry.partner_name() == Some(partner.as_str()),
        Err(_) => true,
    }))
}
