use serde::{Deserialize, Serialize};

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Per-pattern match statistics, kept alongside the label vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub pattern: String,
    pub category: String,
    pub label: String,
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub match_count: u64,
    #[serde(default)]
    pub last_matched: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Transaction {
    pub fn is_categorized(&self) -> bool {
        self.category.is_some() && self.label.is_some()
    }
}

/// Raw transaction fields as they arrive from the CLI or a statement file.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub label: Option<String>,
    pub entity: Option<String>,
    pub currency: Option<String>,
    pub reference: Option<String>,
}

/// Intermediate representation from a CSV parser before it reaches the ledger.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    pub filename: String,
    pub checksum: String,
    pub record_count: usize,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
    pub imported_at: String,
}

fn default_true() -> bool {
    true
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_pattern_confidence() -> f64 {
    0.8
}

fn default_currency() -> String {
    "ZAR".to_string()
}
