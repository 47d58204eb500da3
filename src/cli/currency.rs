use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;

use super::open;

pub fn list(dir: &Path) -> Result<()> {
    let ws = open(dir)?;
    let default = ws.currencies.default_code().to_string();
    let mut table = Table::new();
    table.set_header(vec!["Code", "Symbol", "Name", "Rate (ZAR)", "Decimals", "Default"]);
    for c in ws.currencies.list() {
        table.add_row(vec![
            Cell::new(&c.code),
            Cell::new(&c.symbol),
            Cell::new(&c.name),
            Cell::new(format!("{:.4}", c.exchange_rate)),
            Cell::new(c.decimal_places),
            Cell::new(if c.code == default { "*" } else { "" }),
        ]);
    }
    println!("Currencies\n{table}");
    Ok(())
}

pub fn convert(dir: &Path, amount: f64, from: &str, to: &str) -> Result<()> {
    let ws = open(dir)?;
    let converted = ws.currencies.convert(amount, from, to)?;
    let target = ws.currencies.get(to)?;
    println!(
        "{} = {}",
        ws.currencies.format(amount, from),
        ws.currencies.format(converted, &target.code)
    );
    Ok(())
}

pub fn add(dir: &Path, code: &str, symbol: &str, name: &str, rate: f64, decimals: u32) -> Result<()> {
    let mut ws = open(dir)?;
    let added = ws.currencies.add(code, symbol, name, rate, decimals)?.clone();
    ws.save()?;
    println!(
        "Added {} ({}): 1 {} = {}",
        added.name,
        added.symbol,
        added.code,
        money(added.exchange_rate)
    );
    Ok(())
}

pub fn set_rate(dir: &Path, code: &str, rate: f64) -> Result<()> {
    let mut ws = open(dir)?;
    let old = ws.currencies.set_rate(code, rate)?;
    ws.save()?;
    println!("Updated {} rate: {old} \u{2192} {rate}", code.trim().to_uppercase());
    Ok(())
}

pub fn set_default(dir: &Path, code: &str) -> Result<()> {
    let mut ws = open(dir)?;
    ws.currencies.set_default(code)?;
    ws.save()?;
    println!("Default currency: {}", ws.currencies.default_code());
    Ok(())
}
