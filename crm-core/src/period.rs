//! Month arithmetic and "today" resolution for reporting windows.

use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Number of monthly buckets in a reporting window.
pub const WINDOW_MONTHS: u32 = 12;

/// Truncate a date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by a signed number of months. The day is clamped to the
/// end of the target month.
pub fn shift_months(date: NaiveDate, months: i32) -> AnalyticsResult<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or(AnalyticsError::InvalidMonthArithmetic { date, months })
}

/// First month of the trailing window that ends at the anchor's month.
pub fn window_start(anchor: NaiveDate) -> AnalyticsResult<NaiveDate> {
    shift_months(first_of_month(anchor), -(WINDOW_MONTHS as i32 - 1))
}

/// The twelve first-of-month periods ending at `anchor`'s month, oldest first.
pub fn window_periods(anchor: NaiveDate) -> AnalyticsResult<Vec<NaiveDate>> {
    let start = window_start(anchor)?;
    (0..WINDOW_MONTHS as i32)
        .map(|i| shift_months(start, i))
        .collect()
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Today's date in an IANA time zone like "Europe/Kyiv".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}
