use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{InoutError, Result};
use crate::ledger::Ledger;
use crate::models::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// First day of the period containing `as_of`. Weeks start on Monday.
    pub fn window_start(&self, as_of: NaiveDate) -> NaiveDate {
        let fallback = as_of;
        match self {
            Self::Weekly => as_of - Duration::days(i64::from(as_of.weekday().num_days_from_monday())),
            Self::Monthly => NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1).unwrap_or(fallback),
            Self::Quarterly => {
                let first_month = (as_of.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(as_of.year(), first_month, 1).unwrap_or(fallback)
            }
            Self::Yearly => NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(fallback),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = InoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            other => Err(InoutError::InvalidArgument(format!(
                "Unknown budget period '{other}' (expected weekly, monthly, quarterly, yearly)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    #[serde(default)]
    pub entity: Option<String>,
    pub amount: f64,
    pub period: Period,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Ok,
    Warning,
    Over,
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Over => "over",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 0.8,
            critical: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub start: String,
    pub end: String,
    pub spent: f64,
    pub ratio: f64,
    pub level: BudgetLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetFile {
    #[serde(default)]
    budgets: Vec<Budget>,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetBook {
    data: BudgetFile,
}

fn same_entity(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

fn describe(category: &str, entity: Option<&str>) -> String {
    match entity {
        Some(e) => format!("budget for '{category}' ({e})"),
        None => format!("budget for '{category}'"),
    }
}

impl BudgetBook {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            data: serde_json::from_str(&content)?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    pub fn list(&self) -> &[Budget] {
        &self.data.budgets
    }

    fn position(&self, category: &str, entity: Option<&str>) -> Option<usize> {
        self.data
            .budgets
            .iter()
            .position(|b| b.category == category && same_entity(b.entity.as_deref(), entity))
    }

    /// Add a budget. An existing budget for the same category and entity is
    /// only overwritten when `replace` is set.
    pub fn set(
        &mut self,
        category: &str,
        entity: Option<&str>,
        amount: f64,
        period: Period,
        replace: bool,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(InoutError::InvalidArgument(format!(
                "Budget amount must be positive, got {amount}"
            )));
        }
        let category = category.trim().to_lowercase();
        let entity = entity.map(str::trim).filter(|e| !e.is_empty());
        let budget = Budget {
            category: category.clone(),
            entity: entity.map(str::to_string),
            amount,
            period,
            created_at: timestamp(),
        };
        match self.position(&category, entity) {
            Some(_) if !replace => Err(InoutError::Duplicate(describe(&category, entity))),
            Some(i) => {
                self.data.budgets[i] = budget;
                info!("Replaced {}", describe(&category, entity));
                Ok(())
            }
            None => {
                self.data.budgets.push(budget);
                info!("Created {}", describe(&category, entity));
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, category: &str, entity: Option<&str>) -> Result<()> {
        let category = category.trim().to_lowercase();
        let i = self
            .position(&category, entity)
            .ok_or_else(|| InoutError::NotFound(describe(&category, entity)))?;
        self.data.budgets.remove(i);
        Ok(())
    }

    /// Returns how many budgets were moved.
    pub fn rename_category(&mut self, old: &str, new: &str) -> usize {
        let mut n = 0;
        for b in self.data.budgets.iter_mut().filter(|b| b.category == old) {
            b.category = new.to_string();
            n += 1;
        }
        n
    }

    pub fn remove_category(&mut self, category: &str) -> usize {
        let before = self.data.budgets.len();
        self.data.budgets.retain(|b| b.category != category);
        before - self.data.budgets.len()
    }

    /// Spending against every budget for the period window ending at `as_of`.
    pub fn status(&self, ledger: &Ledger, as_of: NaiveDate, thresholds: Thresholds) -> Vec<BudgetStatus> {
        self.data
            .budgets
            .iter()
            .map(|budget| {
                let start = budget.period.window_start(as_of).format("%Y-%m-%d").to_string();
                let end = as_of.format("%Y-%m-%d").to_string();
                let spent: f64 = ledger
                    .transactions()
                    .iter()
                    .filter(|t| t.category.as_deref() == Some(budget.category.as_str()))
                    .filter(|t| {
                        budget.entity.is_none() || same_entity(t.entity.as_deref(), budget.entity.as_deref())
                    })
                    .filter(|t| t.amount < 0.0)
                    .filter(|t| t.date >= start && t.date <= end)
                    .map(|t| t.amount.abs())
                    .sum();
                let ratio = spent / budget.amount;
                let level = if ratio >= thresholds.critical {
                    BudgetLevel::Over
                } else if ratio >= thresholds.warning {
                    BudgetLevel::Warning
                } else {
                    BudgetLevel::Ok
                };
                BudgetStatus {
                    budget: budget.clone(),
                    start,
                    end,
                    spent,
                    ratio,
                    level,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn spend(ledger: &mut Ledger, d: &str, desc: &str, amount: f64, category: &str, entity: Option<&str>) {
        ledger
            .add(NewTransaction {
                date: d.into(),
                description: desc.into(),
                amount,
                category: Some(category.into()),
                label: None,
                entity: entity.map(str::to_string),
                ..Default::default()
            })
            .unwrap();
    }

    #[test]
    fn test_window_start() {
        let d = date("2024-05-16"); // Thursday
        assert_eq!(Period::Weekly.window_start(d), date("2024-05-13"));
        assert_eq!(Period::Monthly.window_start(d), date("2024-05-01"));
        assert_eq!(Period::Quarterly.window_start(d), date("2024-04-01"));
        assert_eq!(Period::Yearly.window_start(d), date("2024-01-01"));
        assert_eq!(Period::Quarterly.window_start(date("2024-12-31")), date("2024-10-01"));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert!("fortnightly".parse::<Period>().is_err());
    }

    #[test]
    fn test_set_rejects_duplicate_unless_replace() {
        let mut book = BudgetBook::default();
        book.set("groceries", None, 4000.0, Period::Monthly, false).unwrap();
        assert!(matches!(
            book.set("Groceries", None, 5000.0, Period::Monthly, false).unwrap_err(),
            InoutError::Duplicate(_)
        ));
        book.set("groceries", None, 5000.0, Period::Monthly, true).unwrap();
        assert_eq!(book.list().len(), 1);
        assert_eq!(book.list()[0].amount, 5000.0);

        book.set("groceries", Some("mom"), 1500.0, Period::Weekly, false).unwrap();
        assert_eq!(book.list().len(), 2);
    }

    #[test]
    fn test_set_rejects_non_positive() {
        let mut book = BudgetBook::default();
        assert!(book.set("home", None, 0.0, Period::Monthly, false).is_err());
        assert!(book.set("home", None, -10.0, Period::Monthly, false).is_err());
    }

    #[test]
    fn test_remove() {
        let mut book = BudgetBook::default();
        book.set("home", Some("Dad"), 100.0, Period::Monthly, false).unwrap();
        assert!(matches!(book.remove("home", None).unwrap_err(), InoutError::NotFound(_)));
        book.remove("home", Some("dad")).unwrap();
        assert!(book.list().is_empty());
    }

    #[test]
    fn test_status_levels() {
        let mut ledger = Ledger::default();
        spend(&mut ledger, "2024-05-02", "PICK N PAY", -3000.0, "groceries", None);
        spend(&mut ledger, "2024-05-10", "SPAR", -300.0, "groceries", None);
        spend(&mut ledger, "2024-04-28", "LAST MONTH", -9999.0, "groceries", None);
        spend(&mut ledger, "2024-05-11", "REFUND", 500.0, "groceries", None);
        spend(&mut ledger, "2024-05-03", "SASOL", -1500.0, "motors", None);

        let mut book = BudgetBook::default();
        book.set("groceries", None, 4000.0, Period::Monthly, false).unwrap();
        book.set("motors", None, 1000.0, Period::Monthly, false).unwrap();
        book.set("home", None, 5000.0, Period::Monthly, false).unwrap();

        let status = book.status(&ledger, date("2024-05-20"), Thresholds::default());
        assert_eq!(status[0].spent, 3300.0);
        assert_eq!(status[0].level, BudgetLevel::Warning);
        assert_eq!(status[0].start, "2024-05-01");
        assert_eq!(status[1].level, BudgetLevel::Over);
        assert_eq!(status[2].spent, 0.0);
        assert_eq!(status[2].level, BudgetLevel::Ok);
    }

    #[test]
    fn test_status_scoped_to_entity() {
        let mut ledger = Ledger::default();
        spend(&mut ledger, "2024-05-02", "SALON", -400.0, "mom", Some("Mom"));
        spend(&mut ledger, "2024-05-03", "SALON TWO", -400.0, "mom", Some("Dad"));
        let mut book = BudgetBook::default();
        book.set("mom", Some("mom"), 1000.0, Period::Monthly, false).unwrap();
        let status = book.status(&ledger, date("2024-05-31"), Thresholds::default());
        assert_eq!(status[0].spent, 400.0);
        assert_eq!(status[0].ratio, 0.4);
    }

    #[test]
    fn test_rename_and_remove_category() {
        let mut book = BudgetBook::default();
        book.set("motors", None, 100.0, Period::Monthly, false).unwrap();
        assert_eq!(book.rename_category("motors", "vehicles"), 1);
        assert_eq!(book.list()[0].category, "vehicles");
        assert_eq!(book.remove_category("vehicles"), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.json");
        let mut book = BudgetBook::default();
        book.set("home", None, 100.0, Period::Quarterly, false).unwrap();
        book.save(&path).unwrap();
        let loaded = BudgetBook::load(&path).unwrap();
        assert_eq!(loaded.list()[0].period, Period::Quarterly);
    }
}
