//! Account records and token arithmetic.
//!
//! A user's state is a single `AccountRecord` that is overwritten on every
//! conversion. The record carries the running total plus a snapshot of the
//! conversion that produced it; earlier snapshots live only in the key's
//! write history.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ids::{PartnerKey, UserKey};
use crate::record::{DocType, LedgerRecord};

/// A user's latest cumulative token position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Record tag, always `AccountTransaction`.
    #[serde(rename = "type")]
    pub doc_type: DocType,

    /// The user this record belongs to.
    pub user_id: UserKey,

    /// Running total of all tokens ever converted for this user.
    pub cumulative_tokens: i64,

    /// Partner of the most recent conversion.
    pub partner_name: PartnerKey,

    /// The user's identifier at that partner.
    pub partner_user_id: String,

    /// Date supplied with the most recent conversion.
    pub date: String,

    /// Points converted in the most recent conversion.
    pub points_converted: i64,

    /// Tokens awarded by the most recent conversion.
    pub tokens_awarded: i64,

    /// Exchange rate applied to the most recent conversion.
    pub rate_applied: f64,
}

impl AccountRecord {
    /// Build the next record for a user from one conversion event.
    ///
    /// `prior` is the user's current record, if any. The new total is the
    /// prior total plus `event.tokens_awarded`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` if the running total would overflow.
    pub fn next(prior: Option<&Self>, event: ConversionEvent) -> Result<Self> {
        let previous = prior.map_or(0, |p| p.cumulative_tokens);
        let cumulative_tokens = previous.checked_add(event.tokens_awarded).ok_or_else(|| {
            LedgerError::InvalidInput(format!(
                "cumulative tokens overflow: {previous} + {}",
                event.tokens_awarded
            ))
        })?;

        Ok(Self {
            doc_type: DocType::AccountTransaction,
            user_id: event.user_id,
            cumulative_tokens,
            partner_name: event.partner_name,
            partner_user_id: event.partner_user_id,
            date: event.date,
            points_converted: event.points_converted,
            tokens_awarded: event.tokens_awarded,
            rate_applied: event.rate_applied,
        })
    }

    /// Project to the minimal balance view.
    #[must_use]
    pub fn balance(&self) -> BalanceView {
        BalanceView {
            user_id: self.user_id.clone(),
            cumulative_tokens: self.cumulative_tokens,
        }
    }
}

impl LedgerRecord for AccountRecord {
    const DOC_TYPE: DocType = DocType::AccountTransaction;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

/// One conversion, before it is folded into the user's running total.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionEvent {
    /// Converting user.
    pub user_id: UserKey,
    /// Partner whose points are converted.
    pub partner_name: PartnerKey,
    /// The user's identifier at the partner.
    pub partner_user_id: String,
    /// Caller-supplied date of the conversion.
    pub date: String,
    /// Points converted.
    pub points_converted: i64,
    /// Tokens computed from points and rate.
    pub tokens_awarded: i64,
    /// The rate used.
    pub rate_applied: f64,
}

/// A user's balance as returned by `queryUserTotal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    /// The user.
    pub user_id: UserKey,
    /// Running token total.
    pub cumulative_tokens: i64,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReceipt {
    /// The converting user.
    pub user_id: UserKey,
    /// Partner whose points were converted.
    pub partner_name: PartnerKey,
    /// Points converted.
    pub points_converted: i64,
    /// Rate applied.
    pub rate_applied: f64,
    /// Tokens awarded by this conversion.
    pub tokens_awarded: i64,
    /// The user's new running total.
    pub cumulative_tokens: i64,
}

impl From<&AccountRecord> for ConversionReceipt {
    fn from(record: &AccountRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            partner_name: record.partner_name.clone(),
            points_converted: record.points_converted,
            rate_applied: record.rate_applied,
            tokens_awarded: record.tokens_awarded,
            cumulative_tokens: record.cumulative_tokens,
        }
    }
}

/// Largest points value whose product with a rate is computed exactly (2^53).
pub const MAX_POINTS: i64 = 1 << 53;

/// Parse a points argument as passed on the invocation surface.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` if the text is not an integer in
/// `0..=MAX_POINTS`.
pub fn parse_points(raw: &str) -> Result<i64> {
    let points: i64 = raw.trim().parse().map_err(|_| {
        LedgerError::InvalidInput(format!("pointsToConvert must be an integer, got {raw:?}"))
    })?;
    if points < 0 {
        return Err(LedgerError::InvalidInput(format!(
            "pointsToConvert must not be negative, got {points}"
        )));
    }
    check_points(points)?;
    Ok(points)
}

fn check_points(points: i64) -> Result<()> {
    if points > MAX_POINTS {
        return Err(LedgerError::InvalidInput(format!(
            "pointsToConvert must not exceed {MAX_POINTS}, got {points}"
        )));
    }
    Ok(())
}

/// Compute `floor(points * rate)`.
///
/// Both inputs are non-negative once validated, so flooring and truncating
/// toward zero agree.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` if `points` exceeds [`MAX_POINTS`] or
/// the product does not fit an `i64`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn tokens_for(points: i64, rate: f64) -> Result<i64> {
    // i64::MAX is not representable; 2^63 is the first value that overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    check_points(points)?;
    let product = (points as f64 * rate).floor();
    if !product.is_finite() || product >= LIMIT || product < -LIMIT {
        return Err(LedgerError::InvalidInput(format!(
            "conversion of {points} points at rate {rate} overflows"
        )));
    }
    Ok(product as i64)
}
