pub mod budgets;
pub mod categories;
pub mod categorize;
pub mod currency;
pub mod export;
pub mod import;
pub mod init;
pub mod labels;
pub mod load;
pub mod patterns;
pub mod review;
pub mod settings;
pub mod status;
pub mod transactions;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::workspace::Workspace;

pub(crate) fn open(dir: &Path) -> Result<Workspace> {
    Workspace::open(dir)
}

#[derive(Parser)]
#[command(
    name = "inout",
    version,
    about = "Track money in and out, with keyword auto-categorization."
)]
pub struct Cli {
    /// Workspace directory for this run (overrides settings)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a workspace with the default categories and labels.
    Init {
        /// Path for the workspace (default: ~/Documents/inout)
        #[arg(long)]
        dir: Option<String>,
        /// Your name, stored with the workspace
        #[arg(long)]
        name: Option<String>,
        /// Start with an empty vocabulary
        #[arg(long)]
        empty: bool,
    },
    /// Switch to an existing workspace directory.
    Load {
        /// Path to a directory containing workspace_info.json
        path: String,
    },
    /// Show the current workspace and summary statistics.
    Status,
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage labels within categories.
    Labels {
        #[command(subcommand)]
        command: LabelsCommands,
    },
    /// Manage label patterns (weighted 0.4 per hit).
    Patterns {
        #[command(subcommand)]
        command: PatternsCommands,
    },
    /// Manage label keywords (weighted 0.2 per hit).
    Keywords {
        #[command(subcommand)]
        command: KeywordsCommands,
    },
    /// Categorize a single description.
    Categorize {
        /// Transaction description
        description: String,
        /// Amount (negative for expenses)
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<f64>,
        /// Confidence threshold for this run
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Run the categorizer over stored transactions.
    Recategorize {
        /// Include transactions that are already categorized
        #[arg(long)]
        all: bool,
        /// Confidence threshold for this run
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Import a bank statement CSV.
    Import {
        /// Path to CSV file
        file: String,
        /// Currency of the statement amounts
        #[arg(long)]
        currency: Option<String>,
        /// Entity (person or household) the statement belongs to
        #[arg(long)]
        entity: Option<String>,
        /// Skip auto-categorization after import
        #[arg(long)]
        no_categorize: bool,
    },
    /// Work with transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Interactively categorize uncategorized transactions.
    Review,
    /// Manage budgets.
    Budgets {
        #[command(subcommand)]
        command: BudgetsCommands,
    },
    /// Currencies and exchange rates.
    Currency {
        #[command(subcommand)]
        command: CurrencyCommands,
    },
    /// Write categories, transactions and budgets to a JSON file.
    Export {
        /// Output file (default: <workspace>/exports/inout_export_<timestamp>.json)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        skip_categories: bool,
        #[arg(long)]
        skip_transactions: bool,
        #[arg(long)]
        skip_budgets: bool,
    },
    /// Categorizer settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories.
    List,
    /// Add a category.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Hex color, e.g. #3498DB
        #[arg(long)]
        color: Option<String>,
    },
    /// Change one field: name, description, color, active.
    Update {
        name: String,
        field: String,
        value: String,
    },
    /// Rename a category (transactions and budgets follow).
    Rename { old: String, new: String },
    /// Delete a category.
    Delete {
        name: String,
        /// Also delete its labels and patterns
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum LabelsCommands {
    /// List labels.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a label to a category.
    Add {
        category: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Pattern (repeatable)
        #[arg(long = "pattern")]
        patterns: Vec<String>,
        /// Keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Change one field: name, description, active.
    Update {
        category: String,
        name: String,
        field: String,
        value: String,
    },
    /// Rename a label (transactions follow).
    Rename {
        category: String,
        old: String,
        new: String,
    },
    /// Delete a label.
    Delete {
        category: String,
        name: String,
        /// Also delete its patterns
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum PatternsCommands {
    /// List patterns with match statistics.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Add a pattern to a label.
    Add {
        category: String,
        label: String,
        pattern: String,
        /// Stored confidence for this pattern (0.0-1.0)
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Remove a pattern from a label.
    Remove {
        category: String,
        label: String,
        pattern: String,
    },
}

#[derive(Subcommand)]
pub enum KeywordsCommands {
    /// Add a keyword to a label.
    Add {
        category: String,
        label: String,
        keyword: String,
    },
    /// Remove a keyword from a label.
    Remove {
        category: String,
        label: String,
        keyword: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List transactions.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        entity: Option<String>,
        /// Start date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Only uncategorized transactions
        #[arg(long)]
        uncategorized: bool,
    },
    /// Add a transaction by hand.
    Add {
        date: String,
        description: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        entity: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        /// Categorize automatically when no category is given
        #[arg(long)]
        auto: bool,
    },
    /// Income, expenses and net cash flow.
    Summary,
}

#[derive(Subcommand)]
pub enum BudgetsCommands {
    /// List budgets.
    List,
    /// Create a budget, or replace one with --replace.
    Set {
        category: String,
        amount: f64,
        /// weekly, monthly, quarterly, yearly
        #[arg(long, default_value = "monthly")]
        period: String,
        #[arg(long)]
        entity: Option<String>,
        #[arg(long)]
        replace: bool,
    },
    /// Remove a budget.
    Remove {
        category: String,
        #[arg(long)]
        entity: Option<String>,
    },
    /// Spending against each budget for the current period.
    Status {
        /// Evaluate as of this date (default: today)
        #[arg(long)]
        as_of: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// List currencies and rates.
    List,
    /// Convert an amount between currencies.
    Convert {
        #[arg(allow_hyphen_values = true)]
        amount: f64,
        from: String,
        to: String,
    },
    /// Add a currency (rate in ZAR per unit).
    Add {
        code: String,
        symbol: String,
        name: String,
        rate: f64,
        #[arg(long, default_value_t = 2)]
        decimals: u32,
    },
    /// Set the exchange rate (ZAR per unit).
    SetRate { code: String, rate: f64 },
    /// Set the default currency for new transactions.
    Default { code: String },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show user and categorizer settings.
    Show,
    /// Set the categorizer confidence threshold.
    SetThreshold { threshold: f64 },
}
