//! Header-driven column access and field validation shared by all parsers.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use csv::StringRecord;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d{1,3}(,\d{3})*(\.\d+)?$|^-?\d+(\.\d+)?$").expect("amount pattern")
});

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern"));

/// Maps header names to column indexes
#[derive(Debug, Clone)]
pub struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    /// Resolve columns by header name, failing if any of `required` is absent.
    /// Header matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_headers(headers: &StringRecord, required: &[&str]) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !index.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            bail!("missing required column(s): {}", missing.join(", "));
        }

        Ok(Self { index })
    }

    /// Trimmed cell value, or "" when the column or cell is absent
    pub fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|i| record.get(*i))
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Line number of a record for error messages (1-based, header is line 1)
pub fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

/// Parse a decimal amount, accepting thousands separators ("1,250.00")
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    if !AMOUNT_RE.is_match(s) {
        bail!("invalid number '{s}'");
    }
    Decimal::from_str(&s.replace(',', "")).with_context(|| format!("invalid number '{s}'"))
}

/// Parse a conversion rate, which must be strictly positive
pub fn parse_rate(s: &str) -> Result<Decimal> {
    let rate = parse_decimal(s)?;
    if rate <= Decimal::ZERO {
        bail!("rate must be positive, got {rate}");
    }
    Ok(rate)
}

/// Like `parse_rate`, but an empty cell is `None`
pub fn parse_optional_rate(s: &str) -> Result<Option<Decimal>> {
    if s.is_empty() {
        return Ok(None);
    }
    parse_rate(s).map(Some)
}

/// Parse a non-negative amount
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let amount = parse_decimal(s)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        bail!("negative amount '{s}'");
    }
    Ok(amount)
}

/// Validate a three-letter uppercase currency code
pub fn parse_currency_code(s: &str) -> Result<String> {
    if s.is_empty() {
        bail!("empty currency");
    }
    if !CURRENCY_RE.is_match(s) {
        bail!("invalid currency code '{s}'");
    }
    Ok(s.to_string())
}
