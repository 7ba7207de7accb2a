//! Typed errors raised by the aggregation pipeline.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// No dated rate for the record and the currency has no static fallback.
    #[error("no rate to {target} for currency {currency} on {date}, and no fallback rate is configured")]
    MissingRate {
        currency: String,
        target: String,
        date: NaiveDate,
    },

    /// A product or sum left the range of `Decimal`.
    #[error("decimal overflow while {operation}")]
    Overflow { operation: &'static str },

    #[error("month arithmetic out of range: {date} shifted by {months} months")]
    InvalidMonthArithmetic { date: NaiveDate, months: i32 },
}

pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;
