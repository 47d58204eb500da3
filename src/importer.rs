use std::collections::HashMap;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{InoutError, Result};
use crate::ledger::{duplicate_key, Ledger};
use crate::models::{timestamp, ImportRecord, NewTransaction, ParsedRow};
use crate::validate::{parse_amount, parse_date, sanitize_text};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    reference: Option<usize>,
}

/// Locate the required columns by header name, case-insensitively.
fn find_columns(headers: &csv::StringRecord) -> Result<Columns> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |needles: &[&str]| lowered.iter().position(|h| needles.iter().any(|n| h.contains(n)));

    let date = find(&["date"]);
    let description = find(&["description", "desc"]);
    let amount = find(&["amount"]);
    let reference = find(&["reference", "ref"]);

    let mut missing = Vec::new();
    if date.is_none() {
        missing.push("date");
    }
    if description.is_none() {
        missing.push("description");
    }
    if amount.is_none() {
        missing.push("amount");
    }
    match (date, description, amount) {
        (Some(date), Some(description), Some(amount)) => Ok(Columns {
            date,
            description,
            amount,
            reference,
        }),
        _ => Err(InoutError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        ))),
    }
}

/// Rows that parsed cleanly, plus how many were rejected.
#[derive(Debug, Clone, Default)]
pub struct ParsedStatement {
    pub rows: Vec<ParsedRow>,
    pub invalid: usize,
}

pub fn parse_statement(file_path: &Path, delimiter: u8) -> Result<ParsedStatement> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(file));
    let cols = find_columns(rdr.headers()?)?;

    let mut parsed = ParsedStatement::default();
    for (line, result) in rdr.records().enumerate() {
        let Ok(record) = result else {
            parsed.invalid += 1;
            continue;
        };
        match parse_row(&record, &cols) {
            Ok(row) => parsed.rows.push(row),
            Err(e) => {
                // header is line 1
                debug!("Skipping row {}: {e}", line + 2);
                parsed.invalid += 1;
            }
        }
    }
    Ok(parsed)
}

fn parse_row(record: &csv::StringRecord, cols: &Columns) -> Result<ParsedRow> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();
    let description = sanitize_text(field(cols.description));
    if description.is_empty() {
        return Err(InoutError::Validation("empty description".into()));
    }
    Ok(ParsedRow {
        date: parse_date(field(cols.date))?,
        description,
        amount: parse_amount(field(cols.amount))?,
        reference: cols
            .reference
            .map(|i| field(i).to_string())
            .filter(|r| !r.is_empty()),
    })
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub delimiter: u8,
    pub currency: Option<String>,
    pub entity: Option<String>,
    pub duplicate_detection: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            currency: None,
            entity: None,
            duplicate_detection: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub duplicate_file: bool,
    pub import_id: Option<String>,
}

pub fn import_file(ledger: &mut Ledger, file_path: &Path, opts: &ImportOptions) -> Result<ImportResult> {
    let checksum = compute_checksum(file_path)?;
    if opts.duplicate_detection {
        if let Some(prev) = ledger.find_import_by_checksum(&checksum) {
            warn!("{} was already imported on {}", file_path.display(), prev.imported_at);
            return Ok(ImportResult {
                duplicate_file: true,
                ..Default::default()
            });
        }
    }

    let parsed = parse_statement(file_path, opts.delimiter)?;
    let import_id = ledger.next_import_id(&checksum);

    let mut result = ImportResult {
        invalid: parsed.invalid,
        import_id: Some(import_id.clone()),
        ..Default::default()
    };
    // Rows are only matched against what was stored before this file, and
    // each stored line absorbs at most one incoming row.
    let mut existing = if opts.duplicate_detection {
        ledger.duplicate_counts()
    } else {
        HashMap::new()
    };
    for row in &parsed.rows {
        if let Some(left) = existing
            .get_mut(&duplicate_key(&row.date, &row.description, row.amount))
            .filter(|n| **n > 0)
        {
            *left -= 1;
            result.duplicates += 1;
            continue;
        }
        let new = NewTransaction {
            date: row.date.clone(),
            description: row.description.clone(),
            amount: row.amount,
            entity: opts.entity.clone(),
            currency: opts.currency.clone(),
            reference: row.reference.clone(),
            ..Default::default()
        };
        match ledger.add_imported(new, &import_id) {
            Ok(_) => result.imported += 1,
            Err(InoutError::Validation(msg)) => {
                debug!("Rejected row: {msg}");
                result.invalid += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let dates: Vec<&str> = parsed.rows.iter().map(|r| r.date.as_str()).collect();
    ledger.record_import(ImportRecord {
        id: import_id,
        filename: file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
        checksum,
        record_count: result.imported,
        date_range_start: dates.iter().min().map(|d| d.to_string()),
        date_range_end: dates.iter().max().map(|d| d.to_string()),
        imported_at: timestamp(),
    });
    info!(
        imported = result.imported,
        duplicates = result.duplicates,
        invalid = result.invalid,
        "Imported {}",
        file_path.display()
    );
    Ok(result)
}
