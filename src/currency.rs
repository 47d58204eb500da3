//! Currency table. Exchange rates are expressed as base-currency (ZAR) units
//! per one unit of the currency, so USD at 18.50 means 1 USD = R18.50.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{InoutError, Result};
use crate::fmt::{format_amount, round_to};
use crate::models::timestamp;
use crate::validate::normalize_currency_code;

pub const BASE_CURRENCY: &str = "ZAR";
const MAX_DECIMALS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub exchange_rate: f64,
    #[serde(default = "default_decimals")]
    pub decimal_places: u32,
}

fn default_decimals() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurrencyFile {
    #[serde(default = "default_code")]
    default_currency: String,
    #[serde(default)]
    last_updated: String,
    currencies: Vec<Currency>,
}

fn default_code() -> String {
    BASE_CURRENCY.to_string()
}

fn currency(code: &str, symbol: &str, name: &str, rate: f64, decimals: u32) -> Currency {
    Currency {
        code: code.into(),
        symbol: symbol.into(),
        name: name.into(),
        exchange_rate: rate,
        decimal_places: decimals,
    }
}

#[derive(Debug, Clone)]
pub struct CurrencyTable {
    data: CurrencyFile,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            data: CurrencyFile {
                default_currency: default_code(),
                last_updated: timestamp(),
                currencies: vec![
                    currency("ZAR", "R", "South African Rand", 1.0, 2),
                    currency("USD", "$", "US Dollar", 18.50, 2),
                    currency("EUR", "€", "Euro", 20.25, 2),
                    currency("GBP", "£", "British Pound", 23.75, 2),
                    currency("JPY", "¥", "Japanese Yen", 0.124, 0),
                    currency("CNY", "¥", "Chinese Yuan", 2.55, 2),
                ],
            },
        }
    }
}

impl CurrencyTable {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let data: CurrencyFile = serde_json::from_str(&content)?;
        let mut table = Self { data };
        if table.find(BASE_CURRENCY).is_none() {
            table
                .data
                .currencies
                .insert(0, currency("ZAR", "R", "South African Rand", 1.0, 2));
        }
        if table.find(&table.data.default_currency.clone()).is_none() {
            table.data.default_currency = default_code();
        }
        debug!(currencies = table.data.currencies.len(), "Loaded currency table");
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    fn find(&self, code: &str) -> Option<&Currency> {
        self.data.currencies.iter().find(|c| c.code == code)
    }

    pub fn list(&self) -> &[Currency] {
        &self.data.currencies
    }

    pub fn get(&self, code: &str) -> Result<&Currency> {
        let code = normalize_currency_code(code)?;
        self.find(&code)
            .ok_or_else(|| InoutError::NotFound(format!("currency '{code}'")))
    }

    pub fn default_code(&self) -> &str {
        &self.data.default_currency
    }

    pub fn set_default(&mut self, code: &str) -> Result<()> {
        let code = self.get(code)?.code.clone();
        info!("Default currency set to {code}");
        self.data.default_currency = code;
        Ok(())
    }

    /// Register a currency that is not in the table yet. The rate is in base
    /// currency units per one unit of the new currency.
    pub fn add(&mut self, code: &str, symbol: &str, name: &str, rate: f64, decimal_places: u32) -> Result<&Currency> {
        let code = normalize_currency_code(code)?;
        if self.find(&code).is_some() {
            return Err(InoutError::Duplicate(format!("currency '{code}' (use set-rate to change it)")));
        }
        let (symbol, name) = (symbol.trim(), name.trim());
        if symbol.is_empty() || name.is_empty() {
            return Err(InoutError::InvalidArgument("Currency symbol and name cannot be empty".into()));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(InoutError::InvalidArgument(format!(
                "Exchange rate must be a positive number, got {rate}"
            )));
        }
        if decimal_places > MAX_DECIMALS {
            return Err(InoutError::InvalidArgument(format!(
                "Decimal places must be at most {MAX_DECIMALS}, got {decimal_places}"
            )));
        }
        self.data.currencies.push(currency(&code, symbol, name, rate, decimal_places));
        self.data.last_updated = timestamp();
        info!("Added currency {code} ({symbol}) at {rate}");
        self.find(&code)
            .ok_or_else(|| InoutError::Other(format!("currency {code} vanished after insert")))
    }

    /// Returns the previous rate.
    pub fn set_rate(&mut self, code: &str, rate: f64) -> Result<f64> {
        let code = self.get(code)?.code.clone();
        if code == BASE_CURRENCY {
            return Err(InoutError::InvalidArgument(format!(
                "{BASE_CURRENCY} is the base currency, its rate is fixed at 1.0"
            )));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(InoutError::InvalidArgument(format!(
                "Exchange rate must be a positive number, got {rate}"
            )));
        }
        let entry = self
            .data
            .currencies
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| InoutError::NotFound(format!("currency '{code}'")))?;
        let old = entry.exchange_rate;
        entry.exchange_rate = rate;
        self.data.last_updated = timestamp();
        info!("Exchange rate for {code}: {old} -> {rate}");
        Ok(old)
    }

    /// Units of `to` per one unit of `from`.
    pub fn rate(&self, from: &str, to: &str) -> Result<f64> {
        let from = self.get(from)?;
        let to = self.get(to)?;
        Ok(from.exchange_rate / to.exchange_rate)
    }

    /// Convert through the base currency, rounded to the target's decimals.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        let source = self.get(from)?;
        let target = self.get(to)?;
        let base = amount * source.exchange_rate;
        Ok(round_to(base / target.exchange_rate, target.decimal_places))
    }

    /// Format with the currency's symbol and decimals; unknown codes fall
    /// back to a plain two-decimal figure.
    pub fn format(&self, amount: f64, code: &str) -> String {
        match self.get(code) {
            Ok(c) => format_amount(amount, &c.symbol, c.decimal_places),
            Err(_) => format_amount(amount, "", 2),
        }
    }
}
