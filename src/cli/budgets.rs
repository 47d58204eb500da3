use std::path::Path;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::budget::{BudgetLevel, Period, Thresholds};
use crate::error::{InoutError, Result};
use crate::fmt::{money, percent};
use crate::settings::load_settings;
use crate::validate::parse_date;

use super::open;

pub fn list(dir: &Path) -> Result<()> {
    let ws = open(dir)?;
    let mut table = Table::new();
    table.set_header(vec!["Category", "Entity", "Amount", "Period"]);
    for b in ws.budgets.list() {
        table.add_row(vec![
            Cell::new(&b.category),
            Cell::new(b.entity.as_deref().unwrap_or("")),
            Cell::new(money(b.amount)),
            Cell::new(b.period.as_str()),
        ]);
    }
    println!("Budgets\n{table}");
    Ok(())
}

pub fn set(dir: &Path, category: &str, amount: f64, period: &str, entity: Option<&str>, replace: bool) -> Result<()> {
    let period: Period = period.parse()?;
    let mut ws = open(dir)?;
    if ws.store.get_category(category).is_none() {
        return Err(InoutError::NotFound(format!("category '{}'", category.trim().to_lowercase())));
    }
    ws.budgets.set(category, entity, amount, period, replace)?;
    ws.save()?;
    println!("Budget set: {} {} {period}", category.trim().to_lowercase(), money(amount));
    Ok(())
}

pub fn remove(dir: &Path, category: &str, entity: Option<&str>) -> Result<()> {
    let mut ws = open(dir)?;
    ws.budgets.remove(category, entity)?;
    ws.save()?;
    println!("Removed budget for {category}");
    Ok(())
}

pub fn status(dir: &Path, as_of: Option<&str>) -> Result<()> {
    let ws = open(dir)?;
    let settings = load_settings();
    let as_of = match as_of {
        Some(raw) => {
            let normalized = parse_date(raw)?;
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .map_err(|e| InoutError::Validation(e.to_string()))?
        }
        None => Local::now().date_naive(),
    };
    let thresholds = Thresholds {
        warning: settings.budget.warning_threshold,
        critical: settings.budget.critical_threshold,
    };

    let rows = ws.budgets.status(&ws.ledger, as_of, thresholds);
    if rows.is_empty() {
        println!("No budgets set.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Entity", "Period", "Window", "Spent", "Budget", "Used", "Status"]);
    for s in rows {
        let level = match s.level {
            BudgetLevel::Ok => s.level.to_string().green(),
            BudgetLevel::Warning => s.level.to_string().yellow(),
            BudgetLevel::Over => s.level.to_string().red(),
        };
        table.add_row(vec![
            Cell::new(&s.budget.category),
            Cell::new(s.budget.entity.as_deref().unwrap_or("")),
            Cell::new(s.budget.period.as_str()),
            Cell::new(format!("{} to {}", s.start, s.end)),
            Cell::new(money(s.spent)),
            Cell::new(money(s.budget.amount)),
            Cell::new(percent(s.ratio)),
            Cell::new(level),
        ]);
    }
    println!("Budget status as of {as_of}\n{table}");
    Ok(())
}
