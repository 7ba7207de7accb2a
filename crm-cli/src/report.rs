//! Text and JSON rendering of monthly series for the terminal.

use anyhow::Result;
use chrono::NaiveDate;
use crm_analytics::{MonthlySeries, ReportingCurrency};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// JSON document printed by `--json`
#[derive(Debug, Serialize)]
pub struct SeriesReport<'a> {
    pub title: &'a str,
    pub currency: Option<&'a ReportingCurrency>,
    pub anchor: NaiveDate,
    #[serde(flatten)]
    pub series: &'a MonthlySeries,
}

pub fn to_json(report: &SeriesReport<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Bar length for `total`, scaled so that `maximum` fills `width`.
pub fn bar_len(total: Decimal, maximum: Decimal, width: usize) -> usize {
    if maximum <= Decimal::ZERO || total <= Decimal::ZERO {
        return 0;
    }
    let ratio = total.checked_div(maximum).unwrap_or(Decimal::ONE).min(Decimal::ONE);
    (ratio * Decimal::from(width)).round().to_usize().unwrap_or(0)
}

/// One line per month: period, total, and a bar relative to the maximum.
pub fn render_table(report: &SeriesReport<'_>, decimals: u32, width: usize) -> String {
    let mut out = String::new();
    match report.currency {
        Some(c) => out.push_str(&format!(
            "{} in {} ({}), anchor {}\n\n",
            report.title, c.code, c.button_title, report.anchor
        )),
        None => out.push_str(&format!("{}, anchor {}\n\n", report.title, report.anchor)),
    }

    for bucket in &report.series.buckets {
        let bar = "#".repeat(bar_len(bucket.total, report.series.maximum, width));
        out.push_str(&format!(
            "{}  {:>14}  {}\n",
            bucket.period.format("%Y-%m"),
            bucket.total.round_dp(decimals).to_string(),
            bar
        ));
    }

    let total = match report.series.total() {
        Ok(total) => total.round_dp(decimals).to_string(),
        Err(err) => err.to_string(),
    };
    out.push_str(&format!(
        "\nmax {}  total {}\n",
        report.series.maximum.round_dp(decimals),
        total
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::{MonthBucket, RateField, window_periods};

    fn series() -> MonthlySeries {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut buckets: Vec<MonthBucket> = window_periods(anchor)
            .unwrap()
            .into_iter()
            .map(MonthBucket::zero)
            .collect();
        buckets[9].total = Decimal::new(15000, 2);
        buckets[11].total = Decimal::new(7500, 2);
        MonthlySeries {
            buckets,
            maximum: Decimal::new(15000, 2),
        }
    }

    #[test]
    fn test_bar_len_scales_to_maximum() {
        assert_eq!(bar_len(Decimal::from(150), Decimal::from(150), 30), 30);
        assert_eq!(bar_len(Decimal::from(75), Decimal::from(150), 30), 15);
        assert_eq!(bar_len(Decimal::ZERO, Decimal::from(150), 30), 0);
        assert_eq!(bar_len(Decimal::from(5), Decimal::ZERO, 30), 0);
    }

    #[test]
    fn test_render_table_lists_twelve_months() {
        let s = series();
        let currency = ReportingCurrency {
            code: "USD".into(),
            rate_field: RateField::MarketingCurrency,
            button_title: "US Dollar".into(),
        };
        let report = SeriesReport {
            title: "Income",
            currency: Some(&currency),
            anchor: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            series: &s,
        };
        let text = render_table(&report, 2, 10);
        assert!(text.starts_with("Income in USD (US Dollar), anchor 2024-03-15"));
        assert_eq!(text.lines().filter(|l| l.starts_with("20")).count(), 12);
        assert!(text.contains("2024-01          150.00  ##########"));
        assert!(text.contains("max 150.00  total 225.00"));
    }

    #[test]
    fn test_json_report_flattens_series() {
        let s = series();
        let report = SeriesReport {
            title: "Deals",
            currency: None,
            anchor: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            series: &s,
        };
        let v: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(v["buckets"].as_array().unwrap().len(), 12);
        assert_eq!(v["maximum"], "150.00");
        assert_eq!(v["anchor"], "2024-03-15");
    }
}
