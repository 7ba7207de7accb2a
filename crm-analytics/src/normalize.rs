//! Currency normalization: convert a record's amount into the rate table's
//! target currency.

use crm_core::{AnalyticsError, AnalyticsResult, MonetaryRecord, RateSource, RateTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A record together with its amount in the target currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub record: MonetaryRecord,
    pub value: Decimal,
}

/// `record.amount` converted with the exact-date rate, else the currency's
/// static fallback rate. Records already in the target currency pass through
/// unchanged.
pub fn normalize(record: &MonetaryRecord, rates: &RateTable) -> AnalyticsResult<Decimal> {
    convert(record, rates).map(|(value, _)| value)
}

fn convert(record: &MonetaryRecord, rates: &RateTable) -> AnalyticsResult<(Decimal, RateSource)> {
    let (rate, source) = rates
        .lookup(&record.currency_code, record.occurred_on)
        .ok_or_else(|| AnalyticsError::MissingRate {
            currency: record.currency_code.clone(),
            target: rates.target_code().to_string(),
            date: record.occurred_on,
        })?;

    if source == RateSource::Fallback {
        debug!(
            currency = %record.currency_code,
            date = %record.occurred_on,
            %rate,
            "no dated rate, using currency fallback rate"
        );
    }

    let value = record
        .amount
        .checked_mul(rate)
        .ok_or(AnalyticsError::Overflow { operation: "converting an amount" })?;
    Ok((value, source))
}

/// Normalize every record, failing on the first one without a usable rate.
pub fn normalize_all(
    records: &[MonetaryRecord],
    rates: &RateTable,
) -> AnalyticsResult<Vec<NormalizedRecord>> {
    let mut fallbacks = 0usize;
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let (value, source) = convert(record, rates)?;
        if source == RateSource::Fallback {
            fallbacks += 1;
        }
        out.push(NormalizedRecord {
            value,
            record: record.clone(),
        });
    }

    if fallbacks > 0 {
        info!(
            fallbacks,
            records = records.len(),
            target = %rates.target_code(),
            "records converted with currency fallback rates"
        );
    }
    Ok(out)
}
