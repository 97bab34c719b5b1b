//! Partner exchange rates.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ids::PartnerKey;
use crate::record::{DocType, LedgerRecord};

/// The current conversion multiplier offered by one partner.
///
/// Stored under the partner's normalized name; a new write fully replaces
/// the previous rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Record tag, always `ExchangeRate`.
    #[serde(rename = "type")]
    pub doc_type: DocType,

    /// The partner this rate belongs to.
    pub partner_name: PartnerKey,

    /// Tokens awarded per point.
    pub rate: f64,
}

impl ExchangeRate {
    /// Create a rate record after validating the multiplier.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` if `rate` is not a positive finite number.
    pub fn new(partner_name: PartnerKey, rate: f64) -> Result<Self> {
        validate_rate(rate)?;
        Ok(Self {
            doc_type: DocType::ExchangeRate,
            partner_name,
            rate,
        })
    }
}

impl LedgerRecord for ExchangeRate {
    const DOC_TYPE: DocType = DocType::ExchangeRate;

    fn doc_type(&self) -> DocType {
        self.doc_type
    }
}

/// Parse a rate argument as passed on the invocation surface.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` if the text is not a positive finite float.
pub fn parse_rate(raw: &str) -> Result<f64> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidInput(format!("rate must be a float, got {raw:?}")))?;
    validate_rate(rate)?;
    Ok(rate)
}

fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "rate must be a positive finite number, got {rate}"
        )));
    }
    Ok(())
}
