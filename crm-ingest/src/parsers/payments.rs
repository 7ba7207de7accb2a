//! Payments export parser.
//!
//! Expected header (any column order, extra columns ignored):
//!   amount,currency,payment_date

use anyhow::{Context, Result};
use crm_core::MonetaryRecord;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::fields::{Columns, line_of, parse_amount, parse_currency_code, parse_date};

const REQUIRED: &[&str] = &["amount", "currency", "payment_date"];

/// Parse a payments CSV file into validated records.
pub fn parse_payments_csv(path: impl AsRef<Path>) -> Result<Vec<MonetaryRecord>> {
    let path = path.as_ref();
    let file = super::open(path)?;
    read_payments(file).with_context(|| format!("parsing {}", path.display()))
}

/// Parse payments from any reader. Blank rows are skipped; any invalid row
/// fails the whole load.
pub fn read_payments<R: Read>(rdr: R) -> Result<Vec<MonetaryRecord>> {
    let mut rdr = super::reader(rdr);
    let cols = Columns::from_headers(rdr.headers()?, REQUIRED)?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);

        let amount = parse_amount(cols.get(&record, "amount"))
            .with_context(|| format!("line {line}: amount"))?;
        let currency_code = parse_currency_code(cols.get(&record, "currency"))
            .with_context(|| format!("line {line}: currency"))?;
        let occurred_on = parse_date(cols.get(&record, "payment_date"))
            .with_context(|| format!("line {line}: payment_date"))?;

        out.push(MonetaryRecord::new(amount, currency_code, occurred_on));
    }

    debug!(count = out.len(), "loaded payments");
    Ok(out)
}
