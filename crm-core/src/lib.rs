//! crm-core: domain types shared by the ingestion, analytics, and CLI crates

pub mod currency;
pub mod error;
pub mod payment;
pub mod period;

pub use currency::{Currency, CurrencyRate, RateField, RateSource, RateTable};
pub use error::{AnalyticsError, AnalyticsResult};
pub use payment::{MonetaryRecord, MonthBucket};
pub use period::{WINDOW_MONTHS, first_of_month, shift_months, today, today_in, window_periods, window_start};
