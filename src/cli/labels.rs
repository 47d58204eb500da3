use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::store::LabelField;

use super::open;

fn joined(items: &[String]) -> String {
    items.join(", ")
}

pub fn list(dir: &Path, category: Option<&str>) -> Result<()> {
    let ws = open(dir)?;
    let labels = ws.store.list_labels(category)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Label", "Active", "Patterns", "Keywords"]);
    for label in labels {
        table.add_row(vec![
            Cell::new(&label.category),
            Cell::new(&label.name),
            Cell::new(if label.is_active { "yes" } else { "no" }),
            Cell::new(joined(&label.patterns)),
            Cell::new(joined(&label.keywords)),
        ]);
    }
    println!("Labels\n{table}");
    Ok(())
}

pub fn add(
    dir: &Path,
    category: &str,
    name: &str,
    description: &str,
    patterns: &[String],
    keywords: &[String],
) -> Result<()> {
    let mut ws = open(dir)?;
    let label = ws.store.create_label(category, name, description, patterns, keywords)?;
    let msg = format!(
        "Added label: {}/{} ({} patterns, {} keywords)",
        label.category,
        label.name,
        label.patterns.len(),
        label.keywords.len()
    );
    ws.save()?;
    println!("{msg}");
    Ok(())
}

pub fn update(dir: &Path, category: &str, name: &str, field: &str, value: &str) -> Result<()> {
    let field: LabelField = field.parse()?;
    let mut ws = open(dir)?;
    ws.update_label(category, name, field, value)?;
    ws.save()?;
    println!("Updated label {category}/{name}");
    Ok(())
}

pub fn rename(dir: &Path, category: &str, old: &str, new: &str) -> Result<()> {
    let mut ws = open(dir)?;
    let new = ws.rename_label(category, old, new)?;
    ws.save()?;
    println!("Renamed label {category}/{old} to: {new}");
    Ok(())
}

pub fn delete(dir: &Path, category: &str, name: &str, force: bool) -> Result<()> {
    let mut ws = open(dir)?;
    let (patterns, cleared) = ws.delete_label(category, name, force)?;
    ws.save()?;
    println!("Deleted label {category}/{name}");
    if patterns > 0 {
        println!("  removed {patterns} patterns");
    }
    if cleared > 0 {
        println!("  {cleared} transactions are now uncategorized");
    }
    Ok(())
}
