//! Currencies, dated exchange rates, and the lookup table used for
//! normalizing amounts into a single reporting currency.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which conversion target a computation uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RateField {
    #[serde(rename = "rate_to_state_currency")]
    StateCurrency,
    #[serde(rename = "rate_to_marketing_currency")]
    MarketingCurrency,
}

impl RateField {
    /// Column name used in rate and currency exports
    pub fn column(&self) -> &'static str {
        match self {
            RateField::StateCurrency => "rate_to_state_currency",
            RateField::MarketingCurrency => "rate_to_marketing_currency",
        }
    }
}

/// A currency definition with its static (undated) conversion rates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Currency {
    /// ISO 4217 code, e.g. "USD"
    pub code: String,
    pub name: String,
    pub rate_to_state_currency: Option<Decimal>,
    pub rate_to_marketing_currency: Option<Decimal>,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            rate_to_state_currency: None,
            rate_to_marketing_currency: None,
        }
    }

    pub fn with_rate(mut self, field: RateField, rate: Decimal) -> Self {
        match field {
            RateField::StateCurrency => self.rate_to_state_currency = Some(rate),
            RateField::MarketingCurrency => self.rate_to_marketing_currency = Some(rate),
        }
        self
    }

    /// Static rate for the given target, used when no dated rate matches
    pub fn fallback_rate(&self, field: RateField) -> Option<Decimal> {
        match field {
            RateField::StateCurrency => self.rate_to_state_currency,
            RateField::MarketingCurrency => self.rate_to_marketing_currency,
        }
    }
}

/// A dated rate from one currency into the reporting currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyRate {
    pub currency_code: String,
    pub effective_date: NaiveDate,
    pub rate_to_target: Decimal,
}

/// Where a resolved rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Identity,
    Dated,
    Fallback,
}

/// Sparse rate lookup for one target currency.
///
/// Lookup order: identity (record already in the target currency), exact
/// (currency, date) match, then the currency's static fallback rate.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    target_code: String,
    dated: HashMap<(String, NaiveDate), Decimal>,
    fallback: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new(target_code: impl Into<String>) -> Self {
        Self {
            target_code: target_code.into(),
            ..Self::default()
        }
    }

    /// Build a table from dated rates plus the static rates carried by
    /// `currencies` for `field`.
    pub fn from_parts<'a>(
        target_code: impl Into<String>,
        field: RateField,
        rates: impl IntoIterator<Item = CurrencyRate>,
        currencies: impl IntoIterator<Item = &'a Currency>,
    ) -> Self {
        let mut table = Self::new(target_code);
        for rate in rates {
            table.insert_rate(rate);
        }
        for currency in currencies {
            if let Some(rate) = currency.fallback_rate(field) {
                table.insert_fallback(&currency.code, rate);
            }
        }
        table
    }

    pub fn target_code(&self) -> &str {
        &self.target_code
    }

    /// Later inserts for the same (currency, date) replace earlier ones.
    pub fn insert_rate(&mut self, rate: CurrencyRate) {
        self.dated
            .insert((rate.currency_code, rate.effective_date), rate.rate_to_target);
    }

    pub fn insert_fallback(&mut self, currency_code: &str, rate: Decimal) {
        self.fallback.insert(currency_code.to_string(), rate);
    }

    /// Resolve the rate for `currency_code` on `date`, or `None` when neither
    /// a dated nor a fallback rate exists.
    pub fn lookup(&self, currency_code: &str, date: NaiveDate) -> Option<(Decimal, RateSource)> {
        if currency_code == self.target_code {
            return Some((Decimal::ONE, RateSource::Identity));
        }
        if let Some(rate) = self.dated.get(&(currency_code.to_string(), date)) {
            return Some((*rate, RateSource::Dated));
        }
        self.fallback
            .get(currency_code)
            .map(|rate| (*rate, RateSource::Fallback))
    }

    pub fn dated_len(&self) -> usize {
        self.dated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_lookup_prefers_dated_rate() {
        let eur = Currency::new("EUR", "Euro").with_rate(RateField::StateCurrency, dec("40"));
        let rates = vec![CurrencyRate {
            currency_code: "EUR".into(),
            effective_date: d(2024, 1, 10),
            rate_to_target: dec("41.5"),
        }];
        let table = RateTable::from_parts("UAH", RateField::StateCurrency, rates, [&eur]);

        assert_eq!(table.lookup("EUR", d(2024, 1, 10)), Some((dec("41.5"), RateSource::Dated)));
        assert_eq!(table.lookup("EUR", d(2024, 1, 11)), Some((dec("40"), RateSource::Fallback)));
    }

    #[test]
    fn test_lookup_identity_and_missing() {
        let table = RateTable::new("USD");
        assert_eq!(table.lookup("USD", d(2024, 1, 1)), Some((Decimal::ONE, RateSource::Identity)));
        assert_eq!(table.lookup("EUR", d(2024, 1, 1)), None);
    }

    #[test]
    fn test_fallback_rate_per_field() {
        let usd = Currency::new("USD", "US Dollar")
            .with_rate(RateField::StateCurrency, dec("39.2"))
            .with_rate(RateField::MarketingCurrency, dec("1"));
        assert_eq!(usd.fallback_rate(RateField::StateCurrency), Some(dec("39.2")));
        assert_eq!(usd.fallback_rate(RateField::MarketingCurrency), Some(dec("1")));
        assert_eq!(RateField::MarketingCurrency.column(), "rate_to_marketing_currency");
    }

    #[test]
    fn test_rate_field_serde_names() {
        let json = serde_json::to_string(&RateField::StateCurrency).unwrap();
        assert_eq!(json, "\"rate_to_state_currency\"");
    }
}
