use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use crm_analytics::{ReportingCurrency, TimeSeriesAggregator, reporting_currency_for_codes};
use crm_core::{Currency, RateTable, today_in};
use crm_ingest::{
    RateRow, parse_currencies_csv, parse_dates_csv, parse_payments_csv, parse_rates_csv,
    to_currency_rates,
};
use std::path::{Path, PathBuf};
use tracing::info;

mod config;
mod logging;
mod report;
mod state;

use config::Config;
use report::{SeriesReport, render_table, to_json};

#[derive(Parser, Debug)]
#[command(name = "crm", version, about = "CRM analytics: currency-normalized monthly reports")]
struct Cli {
    /// Config file (default: ~/.crm/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by CRM_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly income over the trailing twelve months in the reporting currency
    Income {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Number of records per month over the trailing twelve months
    Count {
        /// CSV with a date column (e.g. a deals export)
        #[arg(long)]
        dates: PathBuf,

        /// Name of the date column
        #[arg(long, default_value = "creation_date")]
        column: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Sum of all payments in the reporting currency, rounded to cents
    Total {
        #[command(flatten)]
        data: DataArgs,

        /// Also print every payment with its converted value
        #[arg(long)]
        list: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show which currency reports are rendered in
    Currency {
        /// Path to currencies CSV (defaults to config)
        #[arg(long)]
        currencies: Option<PathBuf>,
    },

    /// Write the default config to ~/.crm/config.toml
    InitConfig,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Payments CSV: amount,currency,payment_date
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Dated rates CSV: currency,payment_date,rate_to_state_currency,rate_to_marketing_currency.
    /// Optional; currency fallback rates cover dates without a row.
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Currencies CSV: code,name,rate_to_state_currency,rate_to_marketing_currency
    #[arg(long)]
    currencies: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Last month of the window (default: today in the configured time zone)
    #[arg(long)]
    anchor: Option<NaiveDate>,

    /// Print JSON instead of a text table
    #[arg(long)]
    json: bool,
}

/// Everything needed to normalize payments into the reporting currency
struct Loaded {
    currency: ReportingCurrency,
    table: RateTable,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Income { data, output } => {
            let payments_path = data.payments.clone().unwrap_or_else(|| cfg.data.payments.clone());
            let loaded = load_rates(&cfg, &data)?;
            let payments = parse_payments_csv(existing(&payments_path)?)?;
            let anchor = resolve_anchor(&cfg, output.anchor)?;

            let series = TimeSeriesAggregator::new(&loaded.table)
                .with_anchor(anchor)
                .income_over_time(&payments)
                .context("computing income series")?;
            info!(payments = payments.len(), anchor = %anchor, "income series ready");

            let report = SeriesReport {
                title: "Income",
                currency: Some(&loaded.currency),
                anchor,
                series: &series,
            };
            print_series(&report, &cfg, output.json, 2)?;
        }

        Command::Count { dates, column, output } => {
            let dates = parse_dates_csv(existing(&dates)?, &column)?;
            let anchor = resolve_anchor(&cfg, output.anchor)?;

            // Counting needs no conversion; an empty table is enough.
            let table = RateTable::default();
            let series = TimeSeriesAggregator::new(&table)
                .with_anchor(anchor)
                .values_over_time(&dates)?;

            let title = format!("Records by {column}");
            let report = SeriesReport {
                title: &title,
                currency: None,
                anchor,
                series: &series,
            };
            print_series(&report, &cfg, output.json, 0)?;
        }

        Command::Total { data, list, json } => {
            let payments_path = data.payments.clone().unwrap_or_else(|| cfg.data.payments.clone());
            let loaded = load_rates(&cfg, &data)?;
            let payments = parse_payments_csv(existing(&payments_path)?)?;

            let (normalized, total) = TimeSeriesAggregator::new(&loaded.table)
                .current_currency_amount(&payments)
                .context("computing total")?;

            if json {
                let doc = serde_json::json!({
                    "currency": loaded.currency,
                    "total": total,
                    "payments": if list { Some(&normalized) } else { None },
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                if list {
                    for n in &normalized {
                        println!(
                            "{}  {:>12} {}  ->  {:>14} {}",
                            n.record.occurred_on,
                            n.record.amount.to_string(),
                            n.record.currency_code,
                            n.value.round_dp(2).to_string(),
                            loaded.currency.code
                        );
                    }
                    println!();
                }
                println!(
                    "Total: {} {} across {} payments",
                    total,
                    loaded.currency.code,
                    normalized.len()
                );
            }
        }

        Command::Currency { currencies } => {
            let path = currencies.unwrap_or_else(|| cfg.data.currencies.clone());
            let currencies = parse_currencies_csv(existing(&path)?)?;
            let rc = select_currency(&cfg, &currencies);
            println!("Reporting currency: {} ({})", rc.code, rc.button_title);
            println!("Rate column: {}", rc.rate_field.column());
        }

        Command::InitConfig => config::init_config()?,
    }

    Ok(())
}

fn existing(path: &Path) -> Result<&Path> {
    if !path.exists() {
        bail!("CSV not found: {} (pass the path explicitly or set it in config)", path.display());
    }
    Ok(path)
}

fn select_currency(cfg: &Config, currencies: &[Currency]) -> ReportingCurrency {
    reporting_currency_for_codes(
        currencies,
        cfg.currency.marketing_currency_code.as_deref(),
        cfg.currency.state_currency_code.as_deref(),
    )
}

fn load_rates(cfg: &Config, data: &DataArgs) -> Result<Loaded> {
    let currencies_path = data.currencies.clone().unwrap_or_else(|| cfg.data.currencies.clone());
    let currencies = parse_currencies_csv(existing(&currencies_path)?)?;
    let rate_rows = load_rate_rows(data.rates.as_deref(), &cfg.data.rates)?;

    let currency = select_currency(cfg, &currencies);
    let table = RateTable::from_parts(
        currency.code.clone(),
        currency.rate_field,
        to_currency_rates(&rate_rows, currency.rate_field),
        &currencies,
    );
    info!(
        currency = %currency.code,
        rate_column = currency.rate_field.column(),
        dated_rates = table.dated_len(),
        "rate table loaded"
    );

    Ok(Loaded { currency, table })
}

/// Dated rates are optional: when no `--rates` is given and the configured
/// file is absent, every conversion uses the currency fallback rates. An
/// explicit `--rates` path must exist.
fn load_rate_rows(explicit: Option<&Path>, configured: &Path) -> Result<Vec<RateRow>> {
    match explicit {
        Some(path) => parse_rates_csv(existing(path)?),
        None if configured.exists() => parse_rates_csv(configured),
        None => {
            info!(path = %configured.display(), "no dated rates file, using fallback rates only");
            Ok(Vec::new())
        }
    }
}

fn resolve_anchor(cfg: &Config, anchor: Option<NaiveDate>) -> Result<NaiveDate> {
    match anchor {
        Some(a) => Ok(a),
        None => today_in(&cfg.report.time_zone)
            .with_context(|| format!("report.time_zone = {}", cfg.report.time_zone)),
    }
}

fn print_series(report: &SeriesReport<'_>, cfg: &Config, json: bool, decimals: u32) -> Result<()> {
    if json {
        println!("{}", to_json(report)?);
    } else {
        print!("{}", render_table(report, decimals, cfg.report.bar_width));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_rates_file_is_empty() {
        let rows = load_rate_rows(None, Path::new("/nonexistent/crm/rates.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_explicit_rates_file_is_error() {
        let err = load_rate_rows(
            Some(Path::new("/nonexistent/crm/rates.csv")),
            Path::new("rates.csv"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("CSV not found"));
    }
}
