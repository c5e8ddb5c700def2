//! User preferences persisted as JSON next to the application data.

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::{LedgerError, Result};
use crate::services::{UnpaidStatementPolicy, MAX_CYCLE_MONTHS};

const HOME_ENV: &str = "WALLET_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".wallet_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub unpaid_statement_policy: UnpaidStatementPolicy,
    /// Months between consecutive installments of a split purchase.
    #[serde(default = "Config::default_installment_cycle_months")]
    pub installment_cycle_months: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            unpaid_statement_policy: UnpaidStatementPolicy::default(),
            installment_cycle_months: Self::default_installment_cycle_months(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_currency() -> String {
        "BRL".into()
    }

    pub fn default_installment_cycle_months() -> u32 {
        1
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CYCLE_MONTHS).contains(&self.installment_cycle_months) {
            return Err(LedgerError::validation(
                "installmentCycleMonths",
                format!(
                    "{} is outside 1..={MAX_CYCLE_MONTHS}",
                    self.installment_cycle_months
                ),
            ));
        }
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LedgerError::validation(
                "currency",
                format!("`{code}` is not a 3-letter currency code"),
            ));
        }
        Ok(())
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }
}

/// Loads and saves [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    /// `$WALLET_CORE_HOME/config.json`, or `~/.wallet_core/config.json`.
    pub fn default_location() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the stored config, or the defaults when none was saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }
}

/// Application data directory, defaulting to `~/.wallet_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_brazilian_real() {
        let config = Config::default();
        assert_eq!(config.locale, "pt-BR");
        assert_eq!(config.currency_code().as_str(), "BRL");
        assert_eq!(config.unpaid_statement_policy, UnpaidStatementPolicy::MostRecent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "unpaid_statement_policy": "sum_unpaid" }"#).unwrap();
        assert_eq!(config.unpaid_statement_policy, UnpaidStatementPolicy::SumUnpaid);
        assert_eq!(config.installment_cycle_months, 1);
        assert_eq!(config.currency, "BRL");
    }

    #[test]
    fn cycle_outside_a_year_is_rejected() {
        let config = Config {
            installment_cycle_months: 13,
            ..Config::default()
        };
        let err = config.validate().expect_err("13 months");
        assert_eq!(err.field(), Some("installmentCycleMonths"));
    }
}
