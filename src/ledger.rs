//! Transaction ledger plus import history, persisted as `transactions.json`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{InoutError, Result};
use crate::models::{timestamp, ImportRecord, NewTransaction, Transaction};
use crate::validate::{check_amount, normalize_currency_code, parse_date, sanitize_text};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    imports: Vec<ImportRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub label: Option<String>,
    pub entity: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub uncategorized: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSummary {
    pub count: usize,
    pub uncategorized: usize,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    data: LedgerFile,
}

/// Stable id for a transaction: the first 16 hex chars of
/// sha256(`date|description|amount`).
pub fn transaction_id(date: &str, description: &str, amount: f64) -> String {
    hash_id(&format!("{date}|{description}|{amount:.2}"))
}

/// Id for the `seq`-th repeat of an identical transaction (same day,
/// description and amount), as happens with two coffees on one statement.
fn repeat_id(date: &str, description: &str, amount: f64, seq: usize) -> String {
    hash_id(&format!("{date}|{description}|{amount:.2}|{seq}"))
}

fn hash_id(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Key two transactions share when they look like the same bank line.
pub fn duplicate_key(date: &str, description: &str, amount: f64) -> String {
    format!("{date}|{}|{amount:.2}", description.to_lowercase())
}

fn norm(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

impl Ledger {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let data: LedgerFile = serde_json::from_str(&content)?;
        debug!(
            transactions = data.transactions.len(),
            imports = data.imports.len(),
            "Loaded ledger from {}",
            path.display()
        );
        Ok(Self { data })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.data.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.data.transactions.iter().find(|t| t.id == id)
    }

    pub fn is_duplicate(&self, date: &str, description: &str, amount: f64) -> bool {
        let wanted = duplicate_key(date, description, amount);
        self.data
            .transactions
            .iter()
            .any(|t| duplicate_key(&t.date, &t.description, t.amount) == wanted)
    }

    /// How many stored transactions share each duplicate key.
    pub fn duplicate_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for t in &self.data.transactions {
            *counts
                .entry(duplicate_key(&t.date, &t.description, t.amount))
                .or_insert(0) += 1;
        }
        counts
    }

    /// Validate and insert a hand-entered transaction, keeping the ledger
    /// ordered by date. An identical existing transaction is a `Duplicate`.
    pub fn add(&mut self, new: NewTransaction) -> Result<&Transaction> {
        self.insert(new, None, false)
    }

    /// Insert a statement row. Identical rows are all kept; each repeat gets
    /// its own id.
    pub fn add_imported(&mut self, new: NewTransaction, import_id: &str) -> Result<&Transaction> {
        self.insert(new, Some(import_id), true)
    }

    fn insert(&mut self, new: NewTransaction, import_id: Option<&str>, allow_repeats: bool) -> Result<&Transaction> {
        let description = sanitize_text(&new.description);
        if description.is_empty() {
            return Err(InoutError::Validation("Description cannot be empty".into()));
        }
        let date = parse_date(&new.date)?;
        let amount = check_amount(new.amount)?;
        let currency = match new.currency.as_deref() {
            Some(code) => normalize_currency_code(code)?,
            None => "ZAR".to_string(),
        };
        let category = norm(new.category);
        let label = norm(new.label);
        if label.is_some() && category.is_none() {
            return Err(InoutError::Validation(
                "A label needs a category".into(),
            ));
        }

        let mut id = transaction_id(&date, &description, amount);
        if !allow_repeats && self.is_duplicate(&date, &description, amount) {
            return Err(InoutError::Duplicate(format!(
                "transaction on {date} '{description}' {amount:.2}"
            )));
        }
        let mut seq = 1;
        while self.get(&id).is_some() {
            id = repeat_id(&date, &description, amount, seq);
            seq += 1;
        }
        let confidence = category.as_ref().map(|_| 1.0);
        let txn = Transaction {
            id: id.clone(),
            date,
            description,
            amount,
            category,
            label,
            entity: new.entity.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            currency,
            reference: new.reference.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            confidence,
            import_id: import_id.map(str::to_string),
            created_at: timestamp(),
        };
        debug!("Added transaction {id}");
        self.data.transactions.push(txn);
        self.data.transactions.sort_by(|a, b| a.date.cmp(&b.date));
        self.get(&id)
            .ok_or_else(|| InoutError::Other(format!("transaction {id} vanished after insert")))
    }

    pub fn list(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let category = filter.category.as_deref().map(str::to_lowercase);
        let label = filter.label.as_deref().map(str::to_lowercase);
        self.data
            .transactions
            .iter()
            .filter(|t| !filter.uncategorized || !t.is_categorized())
            .filter(|t| category.is_none() || t.category == category)
            .filter(|t| label.is_none() || t.label == label)
            .filter(|t| {
                filter
                    .entity
                    .as_deref()
                    .map_or(true, |e| t.entity.as_deref().is_some_and(|te| te.eq_ignore_ascii_case(e)))
            })
            .filter(|t| filter.from.as_deref().map_or(true, |from| t.date.as_str() >= from))
            .filter(|t| filter.to.as_deref().map_or(true, |to| t.date.as_str() <= to))
            .collect()
    }

    pub fn assign(&mut self, id: &str, category: &str, label: &str, confidence: Option<f64>) -> Result<()> {
        let txn = self
            .data
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| InoutError::NotFound(format!("transaction '{id}'")))?;
        txn.category = Some(category.trim().to_lowercase());
        txn.label = Some(label.trim().to_lowercase());
        txn.confidence = confidence;
        Ok(())
    }

    /// Returns how many transactions moved to the new category name.
    pub fn rename_category(&mut self, old: &str, new: &str) -> usize {
        let mut n = 0;
        for txn in self
            .data
            .transactions
            .iter_mut()
            .filter(|t| t.category.as_deref() == Some(old))
        {
            txn.category = Some(new.to_string());
            n += 1;
        }
        n
    }

    pub fn rename_label(&mut self, category: &str, old: &str, new: &str) -> usize {
        let mut n = 0;
        for txn in self
            .data
            .transactions
            .iter_mut()
            .filter(|t| t.category.as_deref() == Some(category) && t.label.as_deref() == Some(old))
        {
            txn.label = Some(new.to_string());
            n += 1;
        }
        n
    }

    /// Uncategorize every transaction of a category, or of one label in it.
    pub fn clear_category(&mut self, category: &str, label: Option<&str>) -> usize {
        let mut n = 0;
        for txn in self.data.transactions.iter_mut().filter(|t| {
            t.category.as_deref() == Some(category) && label.map_or(true, |l| t.label.as_deref() == Some(l))
        }) {
            txn.category = None;
            txn.label = None;
            txn.confidence = None;
            n += 1;
        }
        n
    }

    pub fn summary(&self) -> LedgerSummary {
        let txns = &self.data.transactions;
        let income: f64 = txns.iter().filter(|t| t.amount > 0.0).map(|t| t.amount).sum();
        let expenses: f64 = txns.iter().filter(|t| t.amount < 0.0).map(|t| t.amount.abs()).sum();
        LedgerSummary {
            count: txns.len(),
            uncategorized: txns.iter().filter(|t| !t.is_categorized()).count(),
            income,
            expenses,
            net: income - expenses,
            first_date: txns.first().map(|t| t.date.clone()),
            last_date: txns.last().map(|t| t.date.clone()),
        }
    }

    // -----------------------------------------------------------------------
    // Import history
    // -----------------------------------------------------------------------

    pub fn imports(&self) -> &[ImportRecord] {
        &self.data.imports
    }

    pub fn find_import_by_checksum(&self, checksum: &str) -> Option<&ImportRecord> {
        self.data.imports.iter().find(|i| i.checksum == checksum)
    }

    pub fn record_import(&mut self, record: ImportRecord) {
        self.data.imports.push(record);
    }

    /// Import id for a file: the first 12 hex chars of its checksum, with a
    /// `-N` suffix when the same file has been imported before.
    pub fn next_import_id(&self, checksum: &str) -> String {
        let base = checksum[..12.min(checksum.len())].to_string();
        let mut id = base.clone();
        let mut n = 1;
        while self.data.imports.iter().any(|i| i.id == id) {
            n += 1;
            id = format!("{base}-{n}");
        }
        id
    }
}
