use chrono::NaiveDate;
use regex::Regex;

use crate::error::{InoutError, Result};

const MAX_AMOUNT: f64 = 999_999_999.0;
const MAX_NAME_LEN: usize = 50;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a statement amount such as `R1,234.50`, `-$20` or `(45.00)`.
/// Parenthesised values are negative.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let symbols = Regex::new(r"[R$€£¥\s,]").map_err(|e| InoutError::Other(e.to_string()))?;
    let cleaned = symbols.replace_all(raw.trim(), "");
    let (negative, body) = match cleaned
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
    {
        Some(inner) => (true, inner.to_string()),
        None => (false, cleaned.to_string()),
    };
    let value: f64 = body
        .parse()
        .map_err(|_| InoutError::Validation(format!("Invalid amount format: {raw}")))?;
    if !value.is_finite() {
        return Err(InoutError::Validation(format!("Invalid amount format: {raw}")));
    }
    check_amount(if negative { -value } else { value })
}

pub fn check_amount(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(InoutError::Validation("Amount must be a finite number".into()));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(InoutError::Validation(format!("Amount too large: {value}")));
    }
    Ok(value)
}

/// Parse a date in any of the accepted statement formats, normalised to `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| InoutError::Validation(format!("Invalid date format: {raw}")))
}

/// Trim and lowercase a category or label identifier, rejecting names the
/// workspace files cannot hold cleanly.
pub fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(InoutError::InvalidArgument("Name cannot be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(InoutError::InvalidArgument(format!(
            "Name too long (max {MAX_NAME_LEN} characters): {name}"
        )));
    }
    let allowed = Regex::new(r"^[a-zA-Z0-9\s\-_/&]+$").map_err(|e| InoutError::Other(e.to_string()))?;
    if !allowed.is_match(name) {
        return Err(InoutError::InvalidArgument(format!(
            "Name contains invalid characters: {name}"
        )));
    }
    Ok(name.to_lowercase())
}

pub fn normalize_currency_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(InoutError::Validation(format!("Invalid currency code: {raw}")));
    }
    Ok(code)
}

/// Collapse runs of whitespace and drop quote/angle characters from free text.
pub fn sanitize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !matches!(c, '<' | '>' | '"' | '\'')).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "off" => Ok(false),
        other => Err(InoutError::InvalidArgument(format!(
            "Expected true/false, got '{other}'"
        ))),
    }
}
