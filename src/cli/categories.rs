use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::store::CategoryField;

use super::open;

pub fn list(dir: &Path) -> Result<()> {
    let ws = open(dir)?;
    let stats = ws.store.statistics();

    let mut table = Table::new();
    table.set_header(vec!["Name", "Description", "Color", "Active", "Labels"]);
    for (cat, (_, labels)) in ws.store.list_categories().iter().zip(stats.labels_per_category) {
        table.add_row(vec![
            Cell::new(&cat.name),
            Cell::new(&cat.description),
            Cell::new(&cat.color),
            Cell::new(if cat.is_active { "yes" } else { "no" }),
            Cell::new(labels),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn add(dir: &Path, name: &str, description: &str, color: Option<&str>) -> Result<()> {
    let mut ws = open(dir)?;
    let created = ws.store.create_category(name, description, color)?.name.clone();
    ws.save()?;
    println!("Added category: {created}");
    Ok(())
}

pub fn update(dir: &Path, name: &str, field: &str, value: &str) -> Result<()> {
    let field: CategoryField = field.parse()?;
    let mut ws = open(dir)?;
    ws.update_category(name, field, value)?;
    ws.save()?;
    println!("Updated category {name}");
    Ok(())
}

pub fn rename(dir: &Path, old: &str, new: &str) -> Result<()> {
    let mut ws = open(dir)?;
    let new = ws.rename_category(old, new)?;
    ws.save()?;
    println!("Renamed category {old} to: {new}");
    Ok(())
}

pub fn delete(dir: &Path, name: &str, force: bool) -> Result<()> {
    let mut ws = open(dir)?;
    let (removed, cleared) = ws.delete_category(name, force)?;
    ws.save()?;
    println!("Deleted category {name}");
    if removed.labels > 0 {
        println!("  removed {} labels and {} patterns", removed.labels, removed.patterns);
    }
    if cleared > 0 {
        println!("  {cleared} transactions are now uncategorized");
    }
    Ok(())
}
