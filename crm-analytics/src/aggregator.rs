//! TimeSeriesAggregator: turns payments and dated records into twelve-month
//! reporting series in one target currency.

use chrono::NaiveDate;
use crm_core::{AnalyticsResult, MonetaryRecord, RateTable, today};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::normalize::{NormalizedRecord, normalize_all};
use crate::series::{MonthlySeries, group_by_month, sum_checked};

/// Decimal places of the grand total
pub const TOTAL_DECIMAL_PLACES: u32 = 2;

/// Stateless aggregator over a borrowed rate table.
///
/// The anchor defaults to today (UTC) when not set; callers that need a
/// time zone or reproducible output should set it explicitly.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesAggregator<'a> {
    rates: &'a RateTable,
    anchor: Option<NaiveDate>,
}

impl<'a> TimeSeriesAggregator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates, anchor: None }
    }

    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// The anchor date in effect for this call
    pub fn anchor(&self) -> NaiveDate {
        self.anchor.unwrap_or_else(today)
    }

    /// Monthly income in the target currency over the trailing twelve months.
    pub fn income_over_time(&self, records: &[MonetaryRecord]) -> AnalyticsResult<MonthlySeries> {
        let anchor = self.anchor();
        let normalized = normalize_all(records, self.rates)?;
        let grouped = group_by_month(
            normalized
                .iter()
                .map(|n| (n.record.occurred_on, n.value)),
        )?;
        debug!(
            records = records.len(),
            months = grouped.len(),
            target = %self.rates.target_code(),
            "grouped income by month"
        );
        MonthlySeries::from_grouped(&grouped, anchor)
    }

    /// Number of dates per month over the trailing twelve months.
    pub fn values_over_time(&self, dates: &[NaiveDate]) -> AnalyticsResult<MonthlySeries> {
        let grouped = group_by_month(dates.iter().map(|date| (*date, Decimal::ONE)))?;
        debug!(records = dates.len(), months = grouped.len(), "grouped counts by month");
        MonthlySeries::from_grouped(&grouped, self.anchor())
    }

    /// Every record with its normalized value, plus the grand total rounded
    /// half-to-even to two decimal places. No window is applied.
    pub fn current_currency_amount(
        &self,
        records: &[MonetaryRecord],
    ) -> AnalyticsResult<(Vec<NormalizedRecord>, Decimal)> {
        let normalized = normalize_all(records, self.rates)?;
        let total = sum_checked(normalized.iter().map(|n| n.value))?;
        let total = total.round_dp_with_strategy(
            TOTAL_DECIMAL_PLACES,
            RoundingStrategy::MidpointNearestEven,
        );
        Ok((normalized, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::{AnalyticsError, Currency, CurrencyRate, RateField};
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_income_example_window() {
        let rates = RateTable::new("USD");
        let records = vec![
            MonetaryRecord::new(dec("100"), "USD", d(2024, 1, 10)),
            MonetaryRecord::new(dec("50"), "USD", d(2024, 1, 20)),
            MonetaryRecord::new(dec("200"), "USD", d(2023, 2, 1)),
        ];
        let series = TimeSeriesAggregator::new(&rates)
            .with_anchor(d(2024, 3, 15))
            .income_over_time(&records)
            .unwrap();

        assert_eq!(series.buckets.len(), 12);
        assert_eq!(series.buckets[0].period, d(2023, 4, 1));
        assert_eq!(series.buckets[11].period, d(2024, 3, 1));
        for bucket in &series.buckets {
            if bucket.period == d(2024, 1, 1) {
                assert_eq!(bucket.total, dec("150"));
            } else {
                assert_eq!(bucket.total, Decimal::ZERO);
            }
        }
        assert_eq!(series.maximum, dec("150"));
    }

    #[test]
    fn test_income_mixed_currencies() {
        let eur = Currency::new("EUR", "Euro").with_rate(RateField::MarketingCurrency, dec("1.10"));
        let rates = RateTable::from_parts(
            "USD",
            RateField::MarketingCurrency,
            vec![CurrencyRate {
                currency_code: "EUR".into(),
                effective_date: d(2024, 2, 1),
                rate_to_target: dec("1.08"),
            }],
            [&eur],
        );
        let records = vec![
            MonetaryRecord::new(dec("100"), "EUR", d(2024, 2, 1)),
            MonetaryRecord::new(dec("100"), "EUR", d(2024, 2, 2)),
            MonetaryRecord::new(dec("10"), "USD", d(2024, 3, 2)),
        ];
        let series = TimeSeriesAggregator::new(&rates)
            .with_anchor(d(2024, 3, 31))
            .income_over_time(&records)
            .unwrap();

        assert_eq!(series.buckets[10].total, dec("218"));
        assert_eq!(series.buckets[11].total, dec("10"));
        assert_eq!(series.maximum, dec("218"));
    }

    #[test]
    fn test_income_missing_rate() {
        let rates = RateTable::new("USD");
        let records = vec![MonetaryRecord::new(dec("1"), "GBP", d(2024, 2, 1))];
        let err = TimeSeriesAggregator::new(&rates)
            .with_anchor(d(2024, 3, 31))
            .income_over_time(&records)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingRate { .. }));
    }

    #[test]
    fn test_values_over_time_counts() {
        let rates = RateTable::new("USD");
        let dates = vec![d(2024, 3, 1), d(2024, 3, 9), d(2023, 12, 25), d(2020, 1, 1)];
        let series = TimeSeriesAggregator::new(&rates)
            .with_anchor(d(2024, 3, 15))
            .values_over_time(&dates)
            .unwrap();

        assert_eq!(series.buckets[11].total, Decimal::from(2));
        assert_eq!(series.buckets[8].total, Decimal::from(1));
        assert_eq!(series.total().unwrap(), Decimal::from(3));
        assert_eq!(series.maximum, Decimal::from(2));
    }

    #[test]
    fn test_anchor_defaults_to_today() {
        let rates = RateTable::new("USD");
        let aggregator = TimeSeriesAggregator::new(&rates);
        let series = aggregator.values_over_time(&[today()]).unwrap();

        assert_eq!(series.buckets.len(), 12);
        assert_eq!(series.buckets[11].period, crm_core::first_of_month(today()));
        assert_eq!(series.buckets[11].total, Decimal::ONE);
    }

    #[test]
    fn test_current_currency_amount_overflow_is_error() {
        let rates = RateTable::new("USD");
        let big = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let records = vec![
            MonetaryRecord::new(big, "USD", d(2024, 1, 1)),
            MonetaryRecord::new(big, "USD", d(2023, 6, 1)),
        ];
        let err = TimeSeriesAggregator::new(&rates)
            .current_currency_amount(&records)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Overflow { .. }));
    }

    #[test]
    fn test_current_currency_amount_rounds_half_even() {
        let rates = RateTable::new("USD");
        let records = vec![
            MonetaryRecord::new(dec("0.125"), "USD", d(2024, 1, 1)),
            MonetaryRecord::new(dec("1.000"), "USD", d(2019, 1, 1)),
        ];
        let (normalized, total) = TimeSeriesAggregator::new(&rates)
            .current_currency_amount(&records)
            .unwrap();
        assert_eq!(normalized.len(), 2);
        assert_eq!(total, dec("1.12"));
    }

    #[test]
    fn test_current_currency_amount_empty() {
        let rates = RateTable::new("USD");
        let (normalized, total) = TimeSeriesAggregator::new(&rates)
            .current_currency_amount(&[])
            .unwrap();
        assert!(normalized.is_empty());
        assert_eq!(total, Decimal::ZERO);
    }
}
