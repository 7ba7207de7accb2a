//! Input rows and derived monthly buckets

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dated, currency-tagged amount (a payment, typically)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonetaryRecord {
    pub amount: Decimal,
    /// ISO 4217 code of `amount`
    pub currency_code: String,
    pub occurred_on: NaiveDate,
}

impl MonetaryRecord {
    pub fn new(amount: Decimal, currency_code: impl Into<String>, occurred_on: NaiveDate) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
            occurred_on,
        }
    }
}

/// Total for one calendar month. `period` is always the first of the month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthBucket {
    pub period: NaiveDate,
    pub total: Decimal,
}

impl MonthBucket {
    pub fn new(period: NaiveDate, total: Decimal) -> Self {
        Self { period, total }
    }

    pub fn zero(period: NaiveDate) -> Self {
        Self::new(period, Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bucket_serializes_period_as_iso_date() {
        let b = MonthBucket::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Decimal::new(15000, 2));
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["period"], "2024-01-01");
        assert_eq!(json["total"], "150.00");
    }

    #[test]
    fn test_zero_bucket() {
        let b = MonthBucket::zero(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(b.is_zero());
    }
}
