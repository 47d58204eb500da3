use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::ledger::TransactionFilter;
use crate::models::NewTransaction;
use crate::validate::{parse_amount, parse_date};

use super::open;

pub fn list(dir: &Path, filter: TransactionFilter) -> Result<()> {
    let ws = open(dir)?;
    let filter = TransactionFilter {
        from: filter.from.as_deref().map(parse_date).transpose()?,
        to: filter.to.as_deref().map(parse_date).transpose()?,
        ..filter
    };
    let rows = ws.ledger.list(&filter);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount", "Category", "Entity", "Conf."]);
    for t in &rows {
        let assigned = match (&t.category, &t.label) {
            (Some(c), Some(l)) => format!("{c}/{l}"),
            (Some(c), None) => c.clone(),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(&t.id[..8]),
            Cell::new(&t.date),
            Cell::new(&t.description),
            Cell::new(ws.currencies.format(t.amount, &t.currency)),
            Cell::new(assigned),
            Cell::new(t.entity.as_deref().unwrap_or("")),
            Cell::new(t.confidence.map(|c| format!("{c:.2}")).unwrap_or_default()),
        ]);
    }
    println!("Transactions ({})\n{table}", rows.len());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    dir: &Path,
    date: &str,
    description: &str,
    amount: &str,
    category: Option<String>,
    label: Option<String>,
    entity: Option<String>,
    currency: Option<String>,
    reference: Option<String>,
    auto: bool,
) -> Result<()> {
    let mut ws = open(dir)?;
    let amount = parse_amount(amount)?;
    let mut new = NewTransaction {
        date: date.to_string(),
        description: description.to_string(),
        amount,
        category,
        label,
        entity,
        currency,
        reference,
    };

    let mut learned = None;
    if auto && new.category.is_none() {
        let result = ws.categorize(description, Some(amount), None)?;
        if let (Some(category), Some(label)) = (result.category, result.label) {
            new.category = Some(category.clone());
            new.label = Some(label.clone());
            learned = Some((category, label, result.confidence));
        }
    }

    let id = ws.add_transaction(new)?;
    if let Some((category, label, confidence)) = learned {
        ws.ledger.assign(&id, &category, &label, Some(confidence))?;
    }
    ws.save()?;

    let assigned = match ws.ledger.get(&id).map(|t| (&t.category, &t.label)) {
        Some((Some(c), Some(l))) => format!("{c}/{l}"),
        Some((Some(c), None)) => c.clone(),
        _ => "uncategorized".to_string(),
    };
    println!("Added transaction {} ({assigned})", &id[..8]);
    Ok(())
}

pub fn summary(dir: &Path) -> Result<()> {
    let ws = open(dir)?;
    let s = ws.ledger.summary();

    if s.count == 0 {
        println!("No transactions yet.");
        return Ok(());
    }
    println!(
        "Period:        {} to {}",
        s.first_date.as_deref().unwrap_or("?"),
        s.last_date.as_deref().unwrap_or("?")
    );
    println!("Transactions:  {} ({} uncategorized)", s.count, s.uncategorized);
    println!("Income:        {}", money(s.income).green());
    println!("Expenses:      {}", money(s.expenses).red());
    let net = money(s.net);
    println!("Net:           {}", if s.net < 0.0 { net.red() } else { net.green() });
    Ok(())
}
