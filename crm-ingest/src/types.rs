use chrono::NaiveDate;
use crm_core::{CurrencyRate, RateField};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a rates export: both conversion targets for a (currency, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub currency_code: String,
    pub effective_date: NaiveDate,
    pub rate_to_state_currency: Decimal,
    pub rate_to_marketing_currency: Decimal,
}

impl RateRow {
    /// Project onto a single conversion target
    pub fn to_currency_rate(&self, field: RateField) -> CurrencyRate {
        let rate_to_target = match field {
            RateField::StateCurrency => self.rate_to_state_currency,
            RateField::MarketingCurrency => self.rate_to_marketing_currency,
        };
        CurrencyRate {
            currency_code: self.currency_code.clone(),
            effective_date: self.effective_date,
            rate_to_target,
        }
    }
}
