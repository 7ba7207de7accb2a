//! Single date-column loader for count series (e.g. deal creation dates).
//!
//! Accepts `YYYY-MM-DD` as well as timestamps that start with a date
//! (`2024-01-10 12:30:00`, `2024-01-10T12:30:00Z`); only the date part is kept.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::fields::{Columns, line_of, parse_date};

pub fn parse_dates_csv(path: impl AsRef<Path>, column: &str) -> Result<Vec<NaiveDate>> {
    let path = path.as_ref();
    let file = super::open(path)?;
    read_dates(file, column).with_context(|| format!("parsing {}", path.display()))
}

/// Read every non-empty cell of `column` as a date.
pub fn read_dates<R: Read>(rdr: R, column: &str) -> Result<Vec<NaiveDate>> {
    let column = column.trim().to_lowercase();
    let mut rdr = super::reader(rdr);
    let cols = Columns::from_headers(rdr.headers()?, &[column.as_str()])?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cell = cols.get(&record, &column);
        if cell.is_empty() {
            continue;
        }
        let line = line_of(&record);
        let date = parse_date(date_part(cell)).with_context(|| format!("line {line}: {column}"))?;
        out.push(date);
    }

    debug!(count = out.len(), column = %column, "loaded dates");
    Ok(out)
}

fn date_part(cell: &str) -> &str {
    match cell.char_indices().nth(10) {
        Some((i, 'T' | ' ')) => &cell[..i],
        _ => cell,
    }
}
