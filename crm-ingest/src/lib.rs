//! crm-ingest: CSV loaders for payments, dated exchange rates, and currency
//! definitions. Malformed rows are rejected here so the analytics crate can
//! assume validated input.

pub mod fields;
pub mod parsers;
pub mod types;

pub use parsers::currencies::{parse_currencies_csv, read_currencies};
pub use parsers::dates::{parse_dates_csv, read_dates};
pub use parsers::payments::{parse_payments_csv, read_payments};
pub use parsers::rates::{parse_rates_csv, read_rates, to_currency_rates};
pub use types::RateRow;
