use std::path::Path;

use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::settings::load_settings;
use crate::workspace::{is_workspace, Workspace};

pub fn run(dir: &Path) -> Result<()> {
    let settings = load_settings();

    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Workspace:  {}", dir.display());

    if !is_workspace(dir) {
        println!();
        println!("Workspace not found. Run `inout init` to set up.");
        return Ok(());
    }

    let ws = Workspace::open(dir)?;
    let stats = ws.statistics()?;
    let summary = ws.ledger.summary();
    println!("Size:       {}", format_bytes(stats.disk_bytes));
    println!("Threshold:  {:.2}", ws.store.settings().confidence_threshold);

    println!();
    println!("Categories:     {} ({} active)", stats.store.categories, stats.store.active_categories);
    println!("Labels:         {} ({} active)", stats.store.labels, stats.store.active_labels);
    println!("Patterns:       {}", stats.store.patterns);
    println!("Transactions:   {}", stats.transactions);
    println!("Uncategorized:  {}", stats.uncategorized);
    println!("Budgets:        {}", stats.budgets);
    println!("Imports:        {}", stats.imports);

    if summary.count > 0 {
        println!();
        println!(
            "Period:         {} to {}",
            summary.first_date.as_deref().unwrap_or("?"),
            summary.last_date.as_deref().unwrap_or("?")
        );
        println!("Net cash flow:  {}", money(summary.net));
    }
    Ok(())
}
