//! Reporting currency selection: which currency analytics are shown in and
//! which conversion target that implies.

use crm_core::{Currency, RateField};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY_CODE: &str = "USD";
pub const DEFAULT_BUTTON_TITLE: &str = "Default Currency";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportingCurrency {
    pub code: String,
    pub rate_field: RateField,
    /// Label for the currency switch in the dashboard, e.g. "Euro > Ukrainian Hryvnia"
    pub button_title: String,
}

/// Marketing currency wins when configured, otherwise the state currency,
/// otherwise USD against the state-currency rates.
pub fn reporting_currency(
    marketing: Option<&Currency>,
    state: Option<&Currency>,
) -> ReportingCurrency {
    match (marketing, state) {
        (Some(m), Some(s)) => ReportingCurrency {
            code: m.code.clone(),
            rate_field: RateField::MarketingCurrency,
            button_title: format!("{} > {}", m.name, s.name),
        },
        (Some(m), None) => ReportingCurrency {
            code: m.code.clone(),
            rate_field: RateField::MarketingCurrency,
            button_title: m.name.clone(),
        },
        (None, Some(s)) => ReportingCurrency {
            code: s.code.clone(),
            rate_field: RateField::StateCurrency,
            button_title: s.name.clone(),
        },
        (None, None) => ReportingCurrency {
            code: DEFAULT_CURRENCY_CODE.to_string(),
            rate_field: RateField::StateCurrency,
            button_title: DEFAULT_BUTTON_TITLE.to_string(),
        },
    }
}

/// Resolve configured codes against the known currencies. Unknown codes
/// count as not configured.
pub fn reporting_currency_for_codes(
    currencies: &[Currency],
    marketing_code: Option<&str>,
    state_code: Option<&str>,
) -> ReportingCurrency {
    let find = |code: Option<&str>| {
        code.and_then(|code| currencies.iter().find(|c| c.code.eq_ignore_ascii_case(code)))
    };
    reporting_currency(find(marketing_code), find(state_code))
}
