use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;

use super::open;

pub fn list(dir: &Path, category: Option<&str>, label: Option<&str>) -> Result<()> {
    let ws = open(dir)?;
    let mut table = Table::new();
    table.set_header(vec!["Pattern", "Category", "Label", "Confidence", "Hits", "Last matched"]);
    for p in ws.store.patterns(category, label) {
        table.add_row(vec![
            Cell::new(&p.pattern),
            Cell::new(&p.category),
            Cell::new(&p.label),
            Cell::new(format!("{:.2}", p.confidence)),
            Cell::new(p.match_count),
            Cell::new(p.last_matched.as_deref().unwrap_or("")),
        ]);
    }
    println!("Patterns\n{table}");
    Ok(())
}

pub fn add(dir: &Path, category: &str, label: &str, pattern: &str, confidence: Option<f64>) -> Result<()> {
    let mut ws = open(dir)?;
    if ws.store.add_pattern(category, label, pattern, confidence)? {
        ws.save()?;
        println!("Added pattern: '{}' \u{2192} {category}/{label}", pattern.trim().to_lowercase());
    } else {
        println!("Pattern '{}' already on {category}/{label}", pattern.trim().to_lowercase());
    }
    Ok(())
}

pub fn remove(dir: &Path, category: &str, label: &str, pattern: &str) -> Result<()> {
    let mut ws = open(dir)?;
    ws.store.remove_pattern(category, label, pattern)?;
    ws.save()?;
    println!("Removed pattern '{}' from {category}/{label}", pattern.trim().to_lowercase());
    Ok(())
}

pub fn add_keyword(dir: &Path, category: &str, label: &str, keyword: &str) -> Result<()> {
    let mut ws = open(dir)?;
    if ws.store.add_keyword(category, label, keyword)? {
        ws.save()?;
        println!("Added keyword: '{}' \u{2192} {category}/{label}", keyword.trim().to_lowercase());
    } else {
        println!("Keyword '{}' already on {category}/{label}", keyword.trim().to_lowercase());
    }
    Ok(())
}

pub fn remove_keyword(dir: &Path, category: &str, label: &str, keyword: &str) -> Result<()> {
    let mut ws = open(dir)?;
    ws.store.remove_keyword(category, label, keyword)?;
    ws.save()?;
    println!("Removed keyword '{}' from {category}/{label}", keyword.trim().to_lowercase());
    Ok(())
}
