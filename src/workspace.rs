//! A workspace directory and everything loaded from it.
//!
//! Operations that touch more than one file (renames, deletes, imports) live
//! here so the vocabulary, ledger and budgets stay consistent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::budget::{Budget, BudgetBook};
use crate::categorizer::{categorize_ledger, classify_and_record, CategorizeResult, Categorizer, CategorizerConfig, Classification};
use crate::currency::CurrencyTable;
use crate::error::{InoutError, Result};
use crate::importer::{import_file, ImportOptions, ImportResult};
use crate::ledger::Ledger;
use crate::models::{timestamp, Category, Label, NewTransaction, Transaction};
use crate::seed::default_store;
use crate::store::{CategoryField, LabelField, PatternStore, Removed, StoreStats};

pub const INFO_FILE: &str = "workspace_info.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";
pub const BUDGETS_FILE: &str = "budgets.json";
pub const CURRENCIES_FILE: &str = "currencies.json";
pub const IMPORTS_DIR: &str = "imports";
pub const EXPORTS_DIR: &str = "exports";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceStats {
    pub store: StoreStats,
    pub transactions: usize,
    pub uncategorized: usize,
    pub budgets: usize,
    pub imports: usize,
    pub disk_bytes: u64,
}

/// Which parts of the workspace go into an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSections {
    pub categories: bool,
    pub transactions: bool,
    pub budgets: bool,
}

impl Default for ExportSections {
    fn default() -> Self {
        Self {
            categories: true,
            transactions: true,
            budgets: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportInfo<'a> {
    created_at: String,
    workspace: &'a str,
    workspace_path: String,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    export_info: ExportInfo<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<&'a [Category]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<&'a Label>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transactions: Option<&'a [Transaction]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budgets: Option<&'a [Budget]>,
}

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    pub info: WorkspaceInfo,
    pub store: PatternStore,
    pub ledger: Ledger,
    pub budgets: BudgetBook,
    pub currencies: CurrencyTable,
}

pub fn is_workspace(dir: &Path) -> bool {
    dir.join(INFO_FILE).exists()
}

fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        total += if meta.is_dir() { dir_size(&entry.path())? } else { meta.len() };
    }
    Ok(total)
}

impl Workspace {
    /// Create a workspace in `dir`, optionally seeded with the starter
    /// vocabulary. Fails if `dir` already holds one.
    pub fn init(dir: &Path, owner: &str, seed: bool) -> Result<Self> {
        if is_workspace(dir) {
            return Err(InoutError::Duplicate(format!("workspace at {}", dir.display())));
        }
        std::fs::create_dir_all(dir.join(IMPORTS_DIR))?;
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("inout")
            .to_string();
        let ws = Self {
            root: dir.to_path_buf(),
            info: WorkspaceInfo {
                name,
                owner: owner.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: timestamp(),
            },
            store: if seed { default_store()? } else { PatternStore::new() },
            ledger: Ledger::default(),
            budgets: BudgetBook::default(),
            currencies: CurrencyTable::default(),
        };
        ws.save()?;
        info!("Initialized workspace at {}", dir.display());
        Ok(ws)
    }

    pub fn open(dir: &Path) -> Result<Self> {
        if !is_workspace(dir) {
            return Err(InoutError::Settings(format!(
                "No workspace found at {}\nRun `inout init` to create one.",
                dir.display()
            )));
        }
        let content = std::fs::read_to_string(dir.join(INFO_FILE))?;
        let info: WorkspaceInfo = serde_json::from_str(&content)?;
        let ws = Self {
            root: dir.to_path_buf(),
            info,
            store: PatternStore::load(&dir.join(CATEGORIES_FILE))?,
            ledger: Ledger::load(&dir.join(TRANSACTIONS_FILE))?,
            budgets: BudgetBook::load(&dir.join(BUDGETS_FILE))?,
            currencies: CurrencyTable::load(&dir.join(CURRENCIES_FILE))?,
        };
        debug!("Opened workspace {}", dir.display());
        Ok(ws)
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.info)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(INFO_FILE), format!("{json}\n"))?;
        self.store.save(&self.root.join(CATEGORIES_FILE))?;
        self.ledger.save(&self.root.join(TRANSACTIONS_FILE))?;
        self.budgets.save(&self.root.join(BUDGETS_FILE))?;
        self.currencies.save(&self.root.join(CURRENCIES_FILE))?;
        debug!("Saved workspace {}", self.root.display());
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // -----------------------------------------------------------------------
    // Categorization
    // -----------------------------------------------------------------------

    /// Categorizer configured from the vocabulary settings, with an optional
    /// per-call threshold.
    pub fn categorizer(&self, threshold: Option<f64>) -> Result<Categorizer> {
        let mut config = CategorizerConfig::from(self.store.settings());
        if let Some(t) = threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(InoutError::InvalidArgument(format!(
                    "Threshold must be between 0.0 and 1.0, got {t}"
                )));
            }
            config.confidence_threshold = t;
        }
        Ok(Categorizer::new(config))
    }

    pub fn categorize(&mut self, description: &str, amount: Option<f64>, threshold: Option<f64>) -> Result<Classification> {
        let categorizer = self.categorizer(threshold)?;
        classify_and_record(&mut self.store, &categorizer, description, amount)
    }

    pub fn recategorize(&mut self, all: bool, threshold: Option<f64>) -> Result<CategorizeResult> {
        let categorizer = self.categorizer(threshold)?;
        categorize_ledger(&mut self.store, &mut self.ledger, &categorizer, all)
    }

    // -----------------------------------------------------------------------
    // Vocabulary changes that reach into the ledger
    // -----------------------------------------------------------------------

    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<String> {
        let old = old.trim().to_lowercase();
        let new = self.store.rename_category(&old, new)?;
        let moved = self.ledger.rename_category(&old, &new);
        self.budgets.rename_category(&old, &new);
        debug!(transactions = moved, "Category rename reached the ledger");
        Ok(new)
    }

    pub fn update_category(&mut self, name: &str, field: CategoryField, value: &str) -> Result<()> {
        match field {
            CategoryField::Name => self.rename_category(name, value).map(|_| ()),
            _ => self.store.update_category(name, field, value),
        }
    }

    /// Returns what was removed from the vocabulary and how many
    /// transactions became uncategorized.
    pub fn delete_category(&mut self, name: &str, force: bool) -> Result<(Removed, usize)> {
        let name = name.trim().to_lowercase();
        let removed = self.store.delete_category(&name, force)?;
        let cleared = self.ledger.clear_category(&name, None);
        self.budgets.remove_category(&name);
        Ok((removed, cleared))
    }

    pub fn rename_label(&mut self, category: &str, old: &str, new: &str) -> Result<String> {
        let category = category.trim().to_lowercase();
        let old = old.trim().to_lowercase();
        let new = self.store.rename_label(&category, &old, new)?;
        self.ledger.rename_label(&category, &old, &new);
        Ok(new)
    }

    pub fn update_label(&mut self, category: &str, name: &str, field: LabelField, value: &str) -> Result<()> {
        match field {
            LabelField::Name => self.rename_label(category, name, value).map(|_| ()),
            _ => self.store.update_label(category, name, field, value),
        }
    }

    /// Returns removed pattern count and uncategorized transaction count.
    pub fn delete_label(&mut self, category: &str, name: &str, force: bool) -> Result<(usize, usize)> {
        let category = category.trim().to_lowercase();
        let name = name.trim().to_lowercase();
        let patterns = self.store.delete_label(&category, &name, force)?;
        let cleared = self.ledger.clear_category(&category, Some(&name));
        Ok((patterns, cleared))
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// Add a transaction after checking its category, label and currency
    /// against this workspace. Returns the new id.
    pub fn add_transaction(&mut self, mut new: NewTransaction) -> Result<String> {
        if let Some(category) = new.category.as_deref() {
            if self.store.get_category(category).is_none() {
                return Err(InoutError::NotFound(format!("category '{}'", category.trim().to_lowercase())));
            }
            if let Some(label) = new.label.as_deref() {
                if self.store.get_label(category, label).is_none() {
                    return Err(InoutError::NotFound(format!(
                        "label '{}' in category '{}'",
                        label.trim().to_lowercase(),
                        category.trim().to_lowercase()
                    )));
                }
            }
        }
        let code = match new.currency.as_deref() {
            Some(code) => self.currencies.get(code)?.code.clone(),
            None => self.currencies.default_code().to_string(),
        };
        new.currency = Some(code);
        Ok(self.ledger.add(new)?.id.clone())
    }

    pub fn assign(&mut self, id: &str, category: &str, label: &str) -> Result<()> {
        if self.store.get_label(category, label).is_none() {
            return Err(InoutError::NotFound(format!("label '{label}' in category '{category}'")));
        }
        self.ledger.assign(id, category, label, Some(1.0))
    }

    /// Import a statement, keep a copy under `imports/`, and optionally run
    /// the categorizer over whatever is still uncategorized.
    pub fn import(
        &mut self,
        file: &Path,
        opts: &ImportOptions,
        auto_categorize: bool,
    ) -> Result<(ImportResult, Option<CategorizeResult>)> {
        let mut opts = opts.clone();
        if let Some(code) = opts.currency.as_deref() {
            opts.currency = Some(self.currencies.get(code)?.code.clone());
        } else {
            opts.currency = Some(self.currencies.default_code().to_string());
        }
        let result = import_file(&mut self.ledger, file, &opts)?;
        if result.duplicate_file {
            return Ok((result, None));
        }
        if let (Some(id), Some(name)) = (&result.import_id, file.file_name()) {
            let archived = self
                .root
                .join(IMPORTS_DIR)
                .join(format!("{id}-{}", name.to_string_lossy()));
            std::fs::create_dir_all(self.root.join(IMPORTS_DIR))?;
            std::fs::copy(file, &archived)?;
        }
        let categorized = if auto_categorize {
            Some(self.recategorize(false, None)?)
        } else {
            None
        };
        Ok((result, categorized))
    }

    /// Write the chosen sections to one JSON file. Without a target path the
    /// file goes to `exports/inout_export_<timestamp>.json`. Returns the path.
    pub fn export(&self, target: Option<&Path>, sections: ExportSections) -> Result<PathBuf> {
        let path = match target {
            Some(p) => p.to_path_buf(),
            None => self.root.join(EXPORTS_DIR).join(format!(
                "inout_export_{}.json",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            )),
        };
        let doc = ExportDocument {
            export_info: ExportInfo {
                created_at: timestamp(),
                workspace: &self.info.name,
                workspace_path: self.root.display().to_string(),
                version: env!("CARGO_PKG_VERSION"),
            },
            categories: sections.categories.then(|| self.store.list_categories()),
            labels: if sections.categories {
                Some(self.store.list_labels(None)?)
            } else {
                None
            },
            transactions: sections.transactions.then(|| self.ledger.transactions()),
            budgets: sections.budgets.then(|| self.budgets.list()),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&path, format!("{json}\n"))?;
        info!("Exported workspace to {}", path.display());
        Ok(path)
    }

    pub fn statistics(&self) -> Result<WorkspaceStats> {
        let summary = self.ledger.summary();
        Ok(WorkspaceStats {
            store: self.store.statistics(),
            transactions: summary.count,
            uncategorized: summary.uncategorized,
            budgets: self.budgets.list().len(),
            imports: self.ledger.imports().len(),
            disk_bytes: dir_size(&self.root)?,
        })
    }
}
