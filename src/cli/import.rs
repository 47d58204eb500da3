use std::path::{Path, PathBuf};

use crate::error::{InoutError, Result};
use crate::importer::ImportOptions;
use crate::settings::load_settings;

use super::open;

pub fn run(dir: &Path, file: &str, currency: Option<&str>, entity: Option<&str>, no_categorize: bool) -> Result<()> {
    let file_path = PathBuf::from(file);
    if !file_path.exists() {
        return Err(InoutError::NotFound(format!("file {}", file_path.display())));
    }
    let settings = load_settings();
    let mut ws = open(dir)?;

    let opts = ImportOptions {
        delimiter: settings.import.delimiter_byte()?,
        currency: currency.map(str::to_string),
        entity: entity.map(str::to_string),
        duplicate_detection: settings.import.duplicate_detection,
    };
    let auto = settings.import.auto_categorize && !no_categorize;
    let (result, categorized) = ws.import(&file_path, &opts, auto)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }
    ws.save()?;

    println!(
        "{} imported, {} skipped (duplicates), {} invalid rows",
        result.imported, result.duplicates, result.invalid
    );
    if let Some(cat) = categorized {
        println!(
            "{} categorized, {} still uncategorized",
            cat.categorized, cat.still_uncategorized
        );
    }
    Ok(())
}
