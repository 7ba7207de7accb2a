//! Monthly grouping, twelve-month gap filling, and maximum extraction.

use chrono::NaiveDate;
use crm_core::{AnalyticsError, AnalyticsResult, MonthBucket, first_of_month, window_periods, window_start};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-month totals keyed by first-of-month period, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals {
    totals: BTreeMap<NaiveDate, Decimal>,
}

impl MonthlyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the month containing `date`
    pub fn add(&mut self, date: NaiveDate, amount: Decimal) -> AnalyticsResult<()> {
        let total = self.totals.entry(first_of_month(date)).or_insert(Decimal::ZERO);
        *total = checked_sum(*total, amount)?;
        Ok(())
    }

    pub fn get(&self, period: NaiveDate) -> Option<Decimal> {
        self.totals.get(&first_of_month(period)).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// All grouped months, oldest first
    pub fn buckets(&self) -> Vec<MonthBucket> {
        self.totals
            .iter()
            .map(|(period, total)| MonthBucket::new(*period, *total))
            .collect()
    }

    /// Grouped months inside the twelve-month window ending at `anchor`,
    /// without gap filling.
    pub fn within_window(&self, anchor: NaiveDate) -> AnalyticsResult<Vec<MonthBucket>> {
        let start = window_start(anchor)?;
        let end = first_of_month(anchor);
        Ok(self
            .totals
            .range(start..=end)
            .map(|(period, total)| MonthBucket::new(*period, *total))
            .collect())
    }
}

fn checked_sum(a: Decimal, b: Decimal) -> AnalyticsResult<Decimal> {
    a.checked_add(b)
        .ok_or(AnalyticsError::Overflow { operation: "summing amounts" })
}

/// Sum `(date, amount)` pairs per calendar month.
pub fn group_by_month<I>(entries: I) -> AnalyticsResult<MonthlyTotals>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let mut totals = MonthlyTotals::new();
    for (date, amount) in entries {
        totals.add(date, amount)?;
    }
    Ok(totals)
}

/// Overflow-checked sum of decimals
pub fn sum_checked<I>(values: I) -> AnalyticsResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, checked_sum)
}

/// Exactly twelve contiguous buckets ending at `anchor`'s month.
///
/// A grouped month older than the window start is dropped; months with no
/// grouped entry get a zero total. Entries outside the window never take a
/// slot, so the result length does not depend on the input.
pub fn fill_twelve_months(
    grouped: &MonthlyTotals,
    anchor: NaiveDate,
) -> AnalyticsResult<Vec<MonthBucket>> {
    let start = window_start(anchor)?;

    let mut items = grouped.buckets();
    if items.first().is_some_and(|first| first.period < start) {
        let dropped = items.remove(0);
        debug!(period = %dropped.period, window_start = %start, "dropping period before window");
    }

    let filled: Vec<MonthBucket> = window_periods(anchor)?
        .into_iter()
        .map(|period| {
            items
                .iter()
                .find(|item| item.period == period)
                .copied()
                .unwrap_or_else(|| MonthBucket::zero(period))
        })
        .collect();

    debug!(
        anchor = %anchor,
        grouped = grouped.len(),
        zero_months = filled.iter().filter(|b| b.is_zero()).count(),
        "filled twelve-month series"
    );
    Ok(filled)
}

/// Largest bucket total, or zero for an empty slice.
pub fn maximum(buckets: &[MonthBucket]) -> Decimal {
    buckets
        .iter()
        .map(|b| b.total)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Gap-filled series handed to the reporting layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySeries {
    pub buckets: Vec<MonthBucket>,
    /// Highest monthly total among months that had data
    pub maximum: Decimal,
}

impl MonthlySeries {
    /// Fill `grouped` around `anchor`. The maximum comes from the grouped
    /// months inside the window, before zero-filling.
    pub fn from_grouped(grouped: &MonthlyTotals, anchor: NaiveDate) -> AnalyticsResult<Self> {
        let maximum = maximum(&grouped.within_window(anchor)?);
        let buckets = fill_twelve_months(grouped, anchor)?;
        Ok(Self { buckets, maximum })
    }

    /// Sum of all bucket totals
    pub fn total(&self) -> AnalyticsResult<Decimal> {
        sum_checked(self.buckets.iter().map(|b| b.total))
    }
}
