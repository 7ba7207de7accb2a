//! Currency definitions export parser.
//!
//! Expected header:
//!   code,name,rate_to_state_currency,rate_to_marketing_currency
//! Rate cells may be empty; such currencies have no static fallback rate for
//! that target.

use anyhow::{Context, Result, bail};
use crm_core::Currency;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::fields::{Columns, line_of, parse_currency_code, parse_optional_rate};

const REQUIRED: &[&str] = &["code", "name"];

pub fn parse_currencies_csv(path: impl AsRef<Path>) -> Result<Vec<Currency>> {
    let path = path.as_ref();
    let file = super::open(path)?;
    read_currencies(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_currencies<R: Read>(rdr: R) -> Result<Vec<Currency>> {
    let mut rdr = super::reader(rdr);
    let cols = Columns::from_headers(rdr.headers()?, REQUIRED)?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);

        let code = parse_currency_code(cols.get(&record, "code"))
            .with_context(|| format!("line {line}: code"))?;
        if !seen.insert(code.clone()) {
            bail!("line {line}: duplicate currency {code}");
        }
        let name = match cols.get(&record, "name") {
            "" => code.clone(),
            name => name.to_string(),
        };

        let rate_to_state_currency = parse_optional_rate(cols.get(&record, "rate_to_state_currency"))
            .with_context(|| format!("line {line}: rate_to_state_currency"))?;
        let rate_to_marketing_currency =
            parse_optional_rate(cols.get(&record, "rate_to_marketing_currency"))
                .with_context(|| format!("line {line}: rate_to_marketing_currency"))?;

        out.push(Currency {
            code,
            name,
            rate_to_state_currency,
            rate_to_marketing_currency,
        });
    }

    debug!(count = out.len(), "loaded currencies");
    Ok(out)
}
