use std::path::Path;

use colored::Colorize;

use crate::error::Result;

use super::open;

pub fn run(dir: &Path, description: &str, amount: Option<f64>, threshold: Option<f64>) -> Result<()> {
    let mut ws = open(dir)?;
    let result = ws.categorize(description, amount, threshold)?;

    match (&result.category, &result.label) {
        (Some(category), Some(label)) => {
            ws.save()?;
            println!(
                "{}",
                format!("{category}/{label} (confidence {:.2})", result.confidence).green()
            );
            if !result.matched_patterns.is_empty() {
                println!("  matched patterns: {}", result.matched_patterns.join(", "));
            }
        }
        _ => println!("{}", "No category matched.".yellow()),
    }
    Ok(())
}

pub fn recategorize(dir: &Path, all: bool, threshold: Option<f64>) -> Result<()> {
    let mut ws = open(dir)?;
    let result = ws.recategorize(all, threshold)?;
    ws.save()?;
    println!(
        "{} categorized, {} still uncategorized",
        result.categorized, result.still_uncategorized
    );
    Ok(())
}
