use std::path::Path;

use crate::error::Result;
use crate::settings::{load_settings, settings_path};

use super::open;

pub fn show(dir: &Path) -> Result<()> {
    let settings = load_settings();
    println!("Settings file:        {}", settings_path().display());
    println!("User:                 {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Workspace:            {}", dir.display());
    println!("Import delimiter:     '{}'", settings.import.csv_delimiter);
    println!("Auto-categorize:      {}", settings.import.auto_categorize);
    println!("Duplicate detection:  {}", settings.import.duplicate_detection);
    println!(
        "Budget thresholds:    warning {:.2}, critical {:.2}",
        settings.budget.warning_threshold, settings.budget.critical_threshold
    );

    let ws = open(dir)?;
    let cat = ws.store.settings();
    println!();
    println!("Confidence threshold: {:.2}", cat.confidence_threshold);
    println!("Default currency:     {}", ws.currencies.default_code());
    Ok(())
}

pub fn set_threshold(dir: &Path, threshold: f64) -> Result<()> {
    let mut ws = open(dir)?;
    ws.store.set_threshold(threshold)?;
    ws.save()?;
    println!("Confidence threshold set to {threshold:.2}");
    Ok(())
}
