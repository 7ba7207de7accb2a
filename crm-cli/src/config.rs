use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{crm_home, ensure_crm_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency: CurrencySection,
    pub report: ReportSection,
    pub data: DataSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencySection {
    /// Reports use this currency when set
    pub marketing_currency_code: Option<String>,
    /// Currency the dated rates are quoted against
    pub state_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSection {
    /// IANA zone used to compute "today" when no anchor is given
    pub time_zone: String,
    /// Width of the bar column in text output
    pub bar_width: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            bar_width: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSection {
    pub payments: PathBuf,
    pub rates: PathBuf,
    pub currencies: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            payments: PathBuf::from("payments.csv"),
            rates: PathBuf::from("rates.csv"),
            currencies: PathBuf::from("currencies.csv"),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(crm_home()?.join("config.toml"))
}

/// Load `path`, or ~/.crm/config.toml when `path` is None. A missing file
/// yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_crm_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
