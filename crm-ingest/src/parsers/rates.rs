//! Dated exchange rate export parser.
//!
//! Expected header:
//!   currency,payment_date,rate_to_state_currency,rate_to_marketing_currency

use anyhow::{Context, Result};
use crm_core::{CurrencyRate, RateField};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::fields::{Columns, line_of, parse_currency_code, parse_date, parse_rate};
use crate::types::RateRow;

const REQUIRED: &[&str] = &[
    "currency",
    "payment_date",
    "rate_to_state_currency",
    "rate_to_marketing_currency",
];

pub fn parse_rates_csv(path: impl AsRef<Path>) -> Result<Vec<RateRow>> {
    let path = path.as_ref();
    let file = super::open(path)?;
    read_rates(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_rates<R: Read>(rdr: R) -> Result<Vec<RateRow>> {
    let mut rdr = super::reader(rdr);
    let cols = Columns::from_headers(rdr.headers()?, REQUIRED)?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);

        let currency_code = parse_currency_code(cols.get(&record, "currency"))
            .with_context(|| format!("line {line}: currency"))?;
        let effective_date = parse_date(cols.get(&record, "payment_date"))
            .with_context(|| format!("line {line}: payment_date"))?;

        let state = rate_cell(&cols, &record, RateField::StateCurrency)
            .with_context(|| format!("line {line}: {}", RateField::StateCurrency.column()))?;
        let marketing = rate_cell(&cols, &record, RateField::MarketingCurrency)
            .with_context(|| format!("line {line}: {}", RateField::MarketingCurrency.column()))?;

        out.push(RateRow {
            currency_code,
            effective_date,
            rate_to_state_currency: state,
            rate_to_marketing_currency: marketing,
        });
    }

    debug!(count = out.len(), "loaded dated rates");
    Ok(out)
}

fn rate_cell(cols: &Columns, record: &StringRecord, field: RateField) -> Result<Decimal> {
    parse_rate(cols.get(record, field.column()))
}

/// Project rate rows onto one conversion target
pub fn to_currency_rates(rows: &[RateRow], field: RateField) -> Vec<CurrencyRate> {
    rows.iter().map(|row| row.to_currency_rate(field)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const RATES: &str = "\
currency,payment_date,rate_to_state_currency,rate_to_marketing_currency
EUR,2024-01-10,41.50,1.09
USD,2024-01-10,38.00,1
";

    #[test]
    fn test_read_rates() {
        let rows = read_rates(RATES.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].currency_code, "EUR");
        assert_eq!(rows[0].rate_to_state_currency, Decimal::from_str("41.50").unwrap());

        let marketing = to_currency_rates(&rows, RateField::MarketingCurrency);
        assert_eq!(marketing[0].rate_to_target, Decimal::from_str("1.09").unwrap());
        assert_eq!(marketing[1].rate_to_target, Decimal::ONE);
    }

    #[test]
    fn test_read_rates_rejects_zero_rate() {
        let csv = "currency,payment_date,rate_to_state_currency,rate_to_marketing_currency\nEUR,2024-01-10,0,1\n";
        let msg = format!("{:#}", read_rates(csv.as_bytes()).unwrap_err());
        assert!(msg.contains("must be positive"), "{msg}");
    }

    #[test]
    fn test_read_rates_rejects_bad_date() {
        let csv = "currency,payment_date,rate_to_state_currency,rate_to_marketing_currency\nEUR,10/01/2024,41,1\n";
        let msg = format!("{:#}", read_rates(csv.as_bytes()).unwrap_err());
        assert!(msg.contains("payment_date"), "{msg}");
    }
}
