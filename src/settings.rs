use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InoutError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default = "default_true")]
    pub auto_categorize: bool,
    #[serde(default = "default_true")]
    pub duplicate_detection: bool,
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            auto_categorize: true,
            duplicate_detection: true,
            csv_delimiter: default_delimiter(),
        }
    }
}

impl ImportSettings {
    /// The delimiter as a single byte, as the CSV reader wants it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.csv_delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(InoutError::Settings(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    #[serde(default = "default_warning")]
    pub warning_threshold: f64,
    #[serde(default = "default_critical")]
    pub critical_threshold: f64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            warning_threshold: default_warning(),
            critical_threshold: default_critical(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_workspace_string")]
    pub workspace_dir: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default)]
    pub import: ImportSettings,
    #[serde(default)]
    pub budget: BudgetSettings,
}

fn default_true() -> bool {
    true
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_warning() -> f64 {
    0.8
}

fn default_critical() -> f64 {
    1.0
}

fn default_currency() -> String {
    "ZAR".to_string()
}

fn default_workspace_string() -> String {
    default_workspace_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_string(),
            user_name: String::new(),
            default_currency: default_currency(),
            import: ImportSettings::default(),
            budget: BudgetSettings::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("inout")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_workspace_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("inout")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| InoutError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

/// The workspace for this invocation: `--workspace` wins over the settings file.
pub fn resolve_workspace(override_dir: Option<&Path>, settings: &Settings) -> PathBuf {
    match override_dir {
        Some(dir) => PathBuf::from(shellexpand_path(&dir.to_string_lossy())),
        None => PathBuf::from(shellexpand_path(&settings.workspace_dir)),
    }
}
