//! crm-analytics: currency normalization, monthly grouping, twelve-month gap
//! filling, and reporting currency selection

pub mod aggregator;
pub mod normalize;
pub mod reporting;
pub mod series;

pub use aggregator::TimeSeriesAggregator;
pub use normalize::{NormalizedRecord, normalize, normalize_all};
pub use reporting::{ReportingCurrency, reporting_currency, reporting_currency_for_codes};
pub use series::{MonthlySeries, MonthlyTotals, fill_twelve_months, group_by_month, maximum};
