//! Category / label vocabulary with per-pattern match statistics.
//!
//! Everything lives in one JSON document (`categories.json`). Categories and
//! labels keep insertion order, which is also the order the categorizer scans
//! them in, so ties between labels resolve the same way on every run.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{InoutError, Result};
use crate::models::{timestamp, Category, Label, PatternRecord};
use crate::scorer::LabelVocabulary;
use crate::validate::{normalize_name, parse_bool};

const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizerSettings {
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    /// Reserved. Persisted for compatibility, no behaviour attached.
    #[serde(default = "default_true")]
    pub auto_learn: bool,
    /// Reserved. Persisted for compatibility, no behaviour attached.
    #[serde(default = "default_true")]
    pub require_human_review: bool,
}

impl Default for CategorizerSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            auto_learn: true,
            require_human_review: true,
        }
    }
}

fn default_threshold() -> f64 {
    0.7
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VocabularyFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    patterns: Vec<PatternRecord>,
    #[serde(default)]
    settings: CategorizerSettings,
}

/// Fields a caller may change through `update_category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Description,
    Color,
    Active,
}

impl FromStr for CategoryField {
    type Err = InoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "color" => Ok(Self::Color),
            "active" | "is_active" => Ok(Self::Active),
            other => Err(InoutError::InvalidArgument(format!(
                "Unknown category field '{other}' (expected name, description, color, active)"
            ))),
        }
    }
}

/// Fields a caller may change through `update_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Name,
    Description,
    Active,
}

impl FromStr for LabelField {
    type Err = InoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "active" | "is_active" => Ok(Self::Active),
            other => Err(InoutError::InvalidArgument(format!(
                "Unknown label field '{other}' (expected name, description, active)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    pub categories: usize,
    pub active_categories: usize,
    pub labels: usize,
    pub active_labels: usize,
    pub patterns: usize,
    pub labels_per_category: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub labels: usize,
    pub patterns: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    data: VocabularyFile,
}

fn key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim, lowercase, drop blanks and repeats while keeping first-seen order.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let t = key(term.as_ref());
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

fn not_found_category(name: &str) -> InoutError {
    InoutError::NotFound(format!("category '{name}'"))
}

fn not_found_label(category: &str, name: &str) -> InoutError {
    InoutError::NotFound(format!("label '{name}' in category '{category}'"))
}

impl PatternStore {
    pub fn new() -> Self {
        Self {
            data: VocabularyFile {
                version: default_version(),
                created_at: timestamp(),
                ..Default::default()
            },
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No vocabulary at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let data: VocabularyFile = serde_json::from_str(&content)?;
        let mut store = Self { data };
        store.repair();
        debug!(
            categories = store.data.categories.len(),
            labels = store.data.labels.len(),
            "Loaded vocabulary from {}",
            path.display()
        );
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    /// Bring hand-edited files back in line: normalised names and terms,
    /// entries that collide after normalisation merged into the first one,
    /// no orphaned labels or pattern records, and a record for every pattern.
    fn repair(&mut self) {
        let mut categories: Vec<Category> = Vec::with_capacity(self.data.categories.len());
        for mut cat in std::mem::take(&mut self.data.categories) {
            cat.name = key(&cat.name);
            match categories.iter_mut().find(|c| c.name == cat.name) {
                Some(first) => {
                    warn!("Merged duplicate category '{}'", cat.name);
                    if first.description.is_empty() {
                        first.description = cat.description;
                    }
                    first.is_active |= cat.is_active;
                }
                None => categories.push(cat),
            }
        }
        self.data.categories = categories;

        let known: Vec<String> = self.data.categories.iter().map(|c| c.name.clone()).collect();
        let mut labels: Vec<Label> = Vec::with_capacity(self.data.labels.len());
        let mut orphans = 0;
        for mut label in std::mem::take(&mut self.data.labels) {
            label.name = key(&label.name);
            label.category = key(&label.category);
            if !known.contains(&label.category) {
                orphans += 1;
                continue;
            }
            match labels
                .iter_mut()
                .find(|l| l.category == label.category && l.name == label.name)
            {
                Some(first) => {
                    warn!("Merged duplicate label '{}/{}'", label.category, label.name);
                    first.patterns.extend(label.patterns);
                    first.keywords.extend(label.keywords);
                    if first.description.is_empty() {
                        first.description = label.description;
                    }
                    first.is_active |= label.is_active;
                }
                None => labels.push(label),
            }
        }
        if orphans > 0 {
            warn!("Dropped {orphans} labels referencing unknown categories");
        }
        for label in &mut labels {
            label.patterns = normalize_terms(&label.patterns);
            label.keywords = normalize_terms(&label.keywords);
        }
        self.data.labels = labels;

        let mut records: Vec<PatternRecord> = Vec::with_capacity(self.data.patterns.len());
        for mut record in std::mem::take(&mut self.data.patterns) {
            record.pattern = key(&record.pattern);
            record.category = key(&record.category);
            record.label = key(&record.label);
            let owned = self.data.labels.iter().any(|l| {
                l.category == record.category && l.name == record.label && l.patterns.contains(&record.pattern)
            });
            if !owned {
                continue;
            }
            match records
                .iter_mut()
                .find(|r| r.category == record.category && r.label == record.label && r.pattern == record.pattern)
            {
                Some(first) => {
                    first.match_count += record.match_count;
                    if record.last_matched > first.last_matched {
                        first.last_matched = record.last_matched;
                    }
                }
                None => records.push(record),
            }
        }
        for label in &self.data.labels {
            for pattern in &label.patterns {
                let exists = records
                    .iter()
                    .any(|p| p.category == label.category && p.label == label.name && &p.pattern == pattern);
                if !exists {
                    records.push(new_record(pattern, &label.category, &label.name, None));
                }
            }
        }
        self.data.patterns = records;
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &CategorizerSettings {
        &self.data.settings
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(InoutError::InvalidArgument(format!(
                "Confidence threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }
        self.data.settings.confidence_threshold = threshold;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    fn category_index(&self, name: &str) -> Option<usize> {
        let name = key(name);
        self.data.categories.iter().position(|c| c.name == name)
    }

    fn label_index(&self, category: &str, name: &str) -> Option<usize> {
        let (category, name) = (key(category), key(name));
        self.data
            .labels
            .iter()
            .position(|l| l.category == category && l.name == name)
    }

    fn require_label(&self, category: &str, name: &str) -> Result<usize> {
        if self.category_index(category).is_none() {
            return Err(not_found_category(&key(category)));
        }
        self.label_index(category, name)
            .ok_or_else(|| not_found_label(&key(category), &key(name)))
    }

    pub fn list_categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn get_category(&self, name: &str) -> Option<&Category> {
        self.category_index(name).map(|i| &self.data.categories[i])
    }

    pub fn create_category(&mut self, name: &str, description: &str, color: Option<&str>) -> Result<&Category> {
        let name = normalize_name(name)?;
        if self.category_index(&name).is_some() {
            return Err(InoutError::Duplicate(format!("category '{name}'")));
        }
        let now = timestamp();
        self.data.categories.push(Category {
            name: name.clone(),
            description: description.trim().to_string(),
            color: color.unwrap_or("#000000").to_string(),
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        });
        info!("Created category {name}");
        Ok(&self.data.categories[self.data.categories.len() - 1])
    }

    /// Apply a single field change. Renames go through `rename_category` so
    /// labels and pattern records follow.
    pub fn update_category(&mut self, name: &str, field: CategoryField, value: &str) -> Result<()> {
        let idx = self.category_index(name).ok_or_else(|| not_found_category(&key(name)))?;
        match field {
            CategoryField::Name => {
                self.rename_category(name, value)?;
                return Ok(());
            }
            CategoryField::Description => self.data.categories[idx].description = value.trim().to_string(),
            CategoryField::Color => self.data.categories[idx].color = value.trim().to_string(),
            CategoryField::Active => self.data.categories[idx].is_active = parse_bool(value)?,
        }
        self.data.categories[idx].updated_at = timestamp();
        Ok(())
    }

    /// Returns the normalised new name.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<String> {
        let old = key(old);
        let idx = self.category_index(&old).ok_or_else(|| not_found_category(&old))?;
        let new = normalize_name(new)?;
        if new == old {
            return Ok(new);
        }
        if self.category_index(&new).is_some() {
            return Err(InoutError::Duplicate(format!("category '{new}'")));
        }
        let cat = &mut self.data.categories[idx];
        cat.name = new.clone();
        cat.updated_at = timestamp();
        for label in self.data.labels.iter_mut().filter(|l| l.category == old) {
            label.category = new.clone();
        }
        for record in self.data.patterns.iter_mut().filter(|p| p.category == old) {
            record.category = new.clone();
        }
        info!("Renamed category {old} -> {new}");
        Ok(new)
    }

    pub fn delete_category(&mut self, name: &str, force: bool) -> Result<Removed> {
        let name = key(name);
        let idx = self.category_index(&name).ok_or_else(|| not_found_category(&name))?;
        let label_count = self.data.labels.iter().filter(|l| l.category == name).count();
        if label_count > 0 && !force {
            let noun = if label_count == 1 { "label" } else { "labels" };
            return Err(InoutError::Conflict(format!(
                "Cannot delete: category '{name}' has {label_count} {noun} (use --force)"
            )));
        }
        let patterns_before = self.data.patterns.len();
        self.data.patterns.retain(|p| p.category != name);
        self.data.labels.retain(|l| l.category != name);
        self.data.categories.remove(idx);
        let removed = Removed {
            labels: label_count,
            patterns: patterns_before - self.data.patterns.len(),
        };
        info!(labels = removed.labels, patterns = removed.patterns, "Deleted category {name}");
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    pub fn get_label(&self, category: &str, name: &str) -> Option<&Label> {
        self.label_index(category, name).map(|i| &self.data.labels[i])
    }

    /// All labels, or the labels of one category.
    pub fn list_labels(&self, category: Option<&str>) -> Result<Vec<&Label>> {
        match category {
            None => Ok(self.data.labels.iter().collect()),
            Some(cat) => {
                let cat = key(cat);
                if self.category_index(&cat).is_none() {
                    return Err(not_found_category(&cat));
                }
                Ok(self.data.labels.iter().filter(|l| l.category == cat).collect())
            }
        }
    }

    pub fn create_label(
        &mut self,
        category: &str,
        name: &str,
        description: &str,
        patterns: &[String],
        keywords: &[String],
    ) -> Result<&Label> {
        let category = key(category);
        if self.category_index(&category).is_none() {
            return Err(not_found_category(&category));
        }
        let name = normalize_name(name)?;
        if self.label_index(&category, &name).is_some() {
            return Err(InoutError::Duplicate(format!(
                "label '{name}' in category '{category}'"
            )));
        }
        let patterns = normalize_terms(patterns);
        let keywords = normalize_terms(keywords);
        for pattern in &patterns {
            self.data.patterns.push(new_record(pattern, &category, &name, None));
        }
        let now = timestamp();
        self.data.labels.push(Label {
            name: name.clone(),
            category: category.clone(),
            description: description.trim().to_string(),
            patterns,
            keywords,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        });
        info!("Created label {category}/{name}");
        Ok(&self.data.labels[self.data.labels.len() - 1])
    }

    pub fn update_label(&mut self, category: &str, name: &str, field: LabelField, value: &str) -> Result<()> {
        let idx = self.require_label(category, name)?;
        match field {
            LabelField::Name => {
                self.rename_label(category, name, value)?;
                return Ok(());
            }
            LabelField::Description => self.data.labels[idx].description = value.trim().to_string(),
            LabelField::Active => self.data.labels[idx].is_active = parse_bool(value)?,
        }
        self.data.labels[idx].updated_at = timestamp();
        Ok(())
    }

    /// Returns the normalised new name.
    pub fn rename_label(&mut self, category: &str, old: &str, new: &str) -> Result<String> {
        let idx = self.require_label(category, old)?;
        let (category, old) = (key(category), key(old));
        let new = normalize_name(new)?;
        if new == old {
            return Ok(new);
        }
        if self.label_index(&category, &new).is_some() {
            return Err(InoutError::Duplicate(format!(
                "label '{new}' in category '{category}'"
            )));
        }
        let label = &mut self.data.labels[idx];
        label.name = new.clone();
        label.updated_at = timestamp();
        for record in self
            .data
            .patterns
            .iter_mut()
            .filter(|p| p.category == category && p.label == old)
        {
            record.label = new.clone();
        }
        info!("Renamed label {category}/{old} -> {new}");
        Ok(new)
    }

    /// Returns the number of pattern records removed with the label.
    pub fn delete_label(&mut self, category: &str, name: &str, force: bool) -> Result<usize> {
        let idx = self.require_label(category, name)?;
        let (category, name) = (key(category), key(name));
        let attached = self
            .data
            .patterns
            .iter()
            .filter(|p| p.category == category && p.label == name)
            .count();
        if attached > 0 && !force {
            let noun = if attached == 1 { "pattern" } else { "patterns" };
            return Err(InoutError::Conflict(format!(
                "Cannot delete: label '{category}/{name}' has {attached} {noun} (use --force)"
            )));
        }
        self.data
            .patterns
            .retain(|p| !(p.category == category && p.label == name));
        self.data.labels.remove(idx);
        info!(patterns = attached, "Deleted label {category}/{name}");
        Ok(attached)
    }

    // -----------------------------------------------------------------------
    // Patterns and keywords
    // -----------------------------------------------------------------------

    /// Returns `false` when the label already had this pattern.
    pub fn add_pattern(&mut self, category: &str, label: &str, pattern: &str, confidence: Option<f64>) -> Result<bool> {
        let idx = self.require_label(category, label)?;
        let pattern = key(pattern);
        if pattern.is_empty() {
            return Err(InoutError::InvalidArgument("Pattern cannot be empty".into()));
        }
        if let Some(c) = confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(InoutError::InvalidArgument(format!(
                    "Pattern confidence must be between 0.0 and 1.0, got {c}"
                )));
            }
        }
        let entry = &mut self.data.labels[idx];
        if entry.patterns.contains(&pattern) {
            return Ok(false);
        }
        entry.patterns.push(pattern.clone());
        entry.updated_at = timestamp();
        let record = new_record(&pattern, &entry.category, &entry.name, confidence);
        debug!("Added pattern '{pattern}' to {}/{}", record.category, record.label);
        self.data.patterns.push(record);
        Ok(true)
    }

    pub fn remove_pattern(&mut self, category: &str, label: &str, pattern: &str) -> Result<()> {
        let idx = self.require_label(category, label)?;
        let pattern = key(pattern);
        let entry = &mut self.data.labels[idx];
        let Some(pos) = entry.patterns.iter().position(|p| *p == pattern) else {
            return Err(InoutError::NotFound(format!(
                "pattern '{pattern}' on label '{}/{}'",
                entry.category, entry.name
            )));
        };
        entry.patterns.remove(pos);
        entry.updated_at = timestamp();
        let (cat, name) = (entry.category.clone(), entry.name.clone());
        self.data
            .patterns
            .retain(|p| !(p.category == cat && p.label == name && p.pattern == pattern));
        debug!("Removed pattern '{pattern}' from {cat}/{name}");
        Ok(())
    }

    /// Returns `false` when the label already had this keyword.
    pub fn add_keyword(&mut self, category: &str, label: &str, keyword: &str) -> Result<bool> {
        let idx = self.require_label(category, label)?;
        let keyword = key(keyword);
        if keyword.is_empty() {
            return Err(InoutError::InvalidArgument("Keyword cannot be empty".into()));
        }
        let entry = &mut self.data.labels[idx];
        if entry.keywords.contains(&keyword) {
            return Ok(false);
        }
        entry.keywords.push(keyword);
        entry.updated_at = timestamp();
        Ok(true)
    }

    pub fn remove_keyword(&mut self, category: &str, label: &str, keyword: &str) -> Result<()> {
        let idx = self.require_label(category, label)?;
        let keyword = key(keyword);
        let entry = &mut self.data.labels[idx];
        let Some(pos) = entry.keywords.iter().position(|k| *k == keyword) else {
            return Err(InoutError::NotFound(format!(
                "keyword '{keyword}' on label '{}/{}'",
                entry.category, entry.name
            )));
        };
        entry.keywords.remove(pos);
        entry.updated_at = timestamp();
        Ok(())
    }

    /// Pattern records, optionally narrowed to a category and/or label name.
    pub fn patterns(&self, category: Option<&str>, label: Option<&str>) -> Vec<&PatternRecord> {
        let category = category.map(key);
        let label = label.map(key);
        self.data
            .patterns
            .iter()
            .filter(|p| category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| label.as_ref().map_or(true, |l| &p.label == l))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Categorizer interface
    // -----------------------------------------------------------------------

    /// Snapshot of every scannable label in insertion order. Labels of an
    /// inactive category are left out along with inactive labels.
    pub fn list_active_labels(&self) -> Vec<LabelVocabulary> {
        self.data
            .labels
            .iter()
            .filter(|l| l.is_active)
            .filter(|l| self.get_category(&l.category).is_some_and(|c| c.is_active))
            .map(|l| LabelVocabulary {
                category: l.category.clone(),
                label: l.name.clone(),
                patterns: l.patterns.clone(),
                keywords: l.keywords.clone(),
            })
            .collect()
    }

    /// Bump match statistics for the given patterns of one label. Returns how
    /// many records were updated.
    pub fn record_matches(&mut self, category: &str, label: &str, patterns: &[String]) -> usize {
        let (category, label) = (key(category), key(label));
        let now = timestamp();
        let mut updated = 0;
        for record in self
            .data
            .patterns
            .iter_mut()
            .filter(|p| p.category == category && p.label == label && patterns.contains(&p.pattern))
        {
            record.match_count += 1;
            record.last_matched = Some(now.clone());
            updated += 1;
            debug!(
                pattern = %record.pattern,
                match_count = record.match_count,
                "Pattern matched for {category}/{label}"
            );
        }
        updated
    }

    pub fn statistics(&self) -> StoreStats {
        let labels_per_category = self
            .data
            .categories
            .iter()
            .map(|c| {
                let n = self.data.labels.iter().filter(|l| l.category == c.name).count();
                (c.name.clone(), n)
            })
            .collect();
        StoreStats {
            categories: self.data.categories.len(),
            active_categories: self.data.categories.iter().filter(|c| c.is_active).count(),
            labels: self.data.labels.len(),
            active_labels: self.data.labels.iter().filter(|l| l.is_active).count(),
            patterns: self.data.patterns.len(),
            labels_per_category,
        }
    }
}

fn new_record(pattern: &str, category: &str, label: &str, confidence: Option<f64>) -> PatternRecord {
    PatternRecord {
        pattern: pattern.to_string(),
        category: category.to_string(),
        label: label.to_string(),
        confidence: confidence.unwrap_or(0.8),
        match_count: 0,
        last_matched: None,
        created_at: timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn motors_store() -> PatternStore {
        let mut store = PatternStore::new();
        store.create_category("Motors", "Vehicle expenses", None).unwrap();
        store
            .create_label("motors", "Fuel", "Fuel and petrol", &terms(&["SASOL", " engen "]), &terms(&["fuel", "petrol"]))
            .unwrap();
        store
    }

    #[test]
    fn test_create_category_normalizes_and_rejects_duplicates() {
        let mut store = PatternStore::new();
        store.create_category("  Groceries ", "", None).unwrap();
        assert!(store.get_category("GROCERIES").is_some());
        let err = store.create_category("groceries", "", None).unwrap_err();
        assert!(matches!(err, InoutError::Duplicate(_)));
    }

    #[test]
    fn test_create_label_requires_category() {
        let mut store = PatternStore::new();
        let err = store.create_label("nope", "fuel", "", &[], &[]).unwrap_err();
        assert!(matches!(err, InoutError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_label_in_same_category() {
        let mut store = motors_store();
        let err = store.create_label("motors", "FUEL", "", &[], &[]).unwrap_err();
        assert!(matches!(err, InoutError::Duplicate(_)));
    }

    #[test]
    fn test_same_label_name_allowed_in_other_category() {
        let mut store = motors_store();
        store.create_category("dad", "", None).unwrap();
        store.create_label("dad", "fuel", "", &[], &[]).unwrap();
        assert_eq!(store.list_labels(None).unwrap().len(), 2);
    }

    #[test]
    fn test_vocabulary_is_normalized_and_deduplicated() {
        let mut store = PatternStore::new();
        store.create_category("home", "", None).unwrap();
        store
            .create_label("home", "utilities", "", &terms(&["Eskom", "eskom ", "  ", "City Power"]), &terms(&["", "Water", "water"]))
            .unwrap();
        let label = store.get_label("home", "utilities").unwrap();
        assert_eq!(label.patterns, vec!["eskom", "city power"]);
        assert_eq!(label.keywords, vec!["water"]);
        assert_eq!(store.patterns(Some("home"), Some("utilities")).len(), 2);
    }

    #[test]
    fn test_add_pattern_is_idempotent() {
        let mut store = motors_store();
        assert!(store.add_pattern("motors", "fuel", " Shell ", None).unwrap());
        assert!(!store.add_pattern("motors", "fuel", "SHELL", None).unwrap());
        let label = store.get_label("motors", "fuel").unwrap();
        assert_eq!(label.patterns, vec!["sasol", "engen", "shell"]);
        assert_eq!(store.patterns(None, Some("fuel")).len(), 3);
    }

    #[test]
    fn test_add_pattern_rejects_blank_and_bad_confidence() {
        let mut store = motors_store();
        assert!(matches!(
            store.add_pattern("motors", "fuel", "   ", None).unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
        assert!(matches!(
            store.add_pattern("motors", "fuel", "caltex", Some(1.5)).unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_pattern_mutation_on_missing_label() {
        let mut store = motors_store();
        assert!(matches!(
            store.add_pattern("motors", "tyres", "hi-q", None).unwrap_err(),
            InoutError::NotFound(_)
        ));
        assert!(matches!(
            store.add_keyword("nothing", "fuel", "diesel").unwrap_err(),
            InoutError::NotFound(_)
        ));
    }

    #[test]
    fn test_remove_pattern_and_keyword() {
        let mut store = motors_store();
        store.remove_pattern("motors", "fuel", "ENGEN").unwrap();
        store.remove_keyword("motors", "fuel", "petrol").unwrap();
        let label = store.get_label("motors", "fuel").unwrap();
        assert_eq!(label.patterns, vec!["sasol"]);
        assert_eq!(label.keywords, vec!["fuel"]);
        assert_eq!(store.patterns(None, None).len(), 1);
        assert!(matches!(
            store.remove_pattern("motors", "fuel", "engen").unwrap_err(),
            InoutError::NotFound(_)
        ));
    }

    #[test]
    fn test_keywords_dedup() {
        let mut store = motors_store();
        assert!(store.add_keyword("motors", "fuel", "Diesel").unwrap());
        assert!(!store.add_keyword("motors", "fuel", "diesel").unwrap());
        assert!(store.add_keyword("motors", "fuel", " ").is_err());
    }

    #[test]
    fn test_rename_category_cascades() {
        let mut store = motors_store();
        store.rename_category("motors", "Vehicles").unwrap();
        assert!(store.get_category("motors").is_none());
        assert!(store.get_label("vehicles", "fuel").is_some());
        assert!(store.patterns(Some("vehicles"), None).len() == 2);
    }

    #[test]
    fn test_rename_label_cascades_and_rejects_clash() {
        let mut store = motors_store();
        store.create_label("motors", "service", "", &[], &[]).unwrap();
        assert!(matches!(
            store.rename_label("motors", "fuel", "service").unwrap_err(),
            InoutError::Duplicate(_)
        ));
        store.rename_label("motors", "fuel", "petrol_diesel").unwrap();
        assert_eq!(store.patterns(Some("motors"), Some("petrol_diesel")).len(), 2);
        assert!(store.patterns(Some("motors"), Some("fuel")).is_empty());
    }

    #[test]
    fn test_delete_category_requires_force() {
        let mut store = motors_store();
        assert!(matches!(
            store.delete_category("motors", false).unwrap_err(),
            InoutError::Conflict(_)
        ));
        let removed = store.delete_category("motors", true).unwrap();
        assert_eq!(removed, Removed { labels: 1, patterns: 2 });
        assert!(store.list_labels(None).unwrap().is_empty());
        assert!(store.patterns(None, None).is_empty());
    }

    #[test]
    fn test_delete_empty_category() {
        let mut store = PatternStore::new();
        store.create_category("other", "", None).unwrap();
        store.delete_category("other", false).unwrap();
        assert!(store.list_categories().is_empty());
    }

    #[test]
    fn test_delete_label_requires_force_when_patterns_remain() {
        let mut store = motors_store();
        assert!(matches!(
            store.delete_label("motors", "fuel", false).unwrap_err(),
            InoutError::Conflict(_)
        ));
        assert_eq!(store.delete_label("motors", "fuel", true).unwrap(), 2);

        store.create_label("motors", "parking", "", &[], &terms(&["parking"])).unwrap();
        assert_eq!(store.delete_label("motors", "parking", false).unwrap(), 0);
    }

    #[test]
    fn test_update_fields() {
        let mut store = motors_store();
        let field: CategoryField = "is_active".parse().unwrap();
        store.update_category("motors", field, "false").unwrap();
        assert!(!store.get_category("motors").unwrap().is_active);
        store.update_category("motors", CategoryField::Description, " Cars ").unwrap();
        assert_eq!(store.get_category("motors").unwrap().description, "Cars");

        store.update_label("motors", "fuel", LabelField::Name, "petrol").unwrap();
        assert!(store.get_label("motors", "petrol").is_some());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            "created_at".parse::<CategoryField>().unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
        assert!(matches!(
            "patterns".parse::<LabelField>().unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
        let mut store = motors_store();
        assert!(store.update_label("motors", "fuel", LabelField::Active, "sometimes").is_err());
    }

    #[test]
    fn test_list_active_labels_skips_inactive() {
        let mut store = motors_store();
        store.create_category("home", "", None).unwrap();
        store.create_label("home", "rent", "", &[], &terms(&["rent"])).unwrap();
        store.create_label("home", "levy", "", &[], &terms(&["levy"])).unwrap();
        store.update_label("home", "levy", LabelField::Active, "false").unwrap();

        let active = store.list_active_labels();
        let names: Vec<&str> = active.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(names, vec!["fuel", "rent"]);

        store.update_category("motors", CategoryField::Active, "no").unwrap();
        let active = store.list_active_labels();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].category, "home");
    }

    #[test]
    fn test_record_matches_updates_stats() {
        let mut store = motors_store();
        let updated = store.record_matches("motors", "fuel", &terms(&["sasol"]));
        assert_eq!(updated, 1);
        store.record_matches("motors", "fuel", &terms(&["sasol"]));
        let records = store.patterns(Some("motors"), Some("fuel"));
        let sasol = records.iter().find(|p| p.pattern == "sasol").unwrap();
        assert_eq!(sasol.match_count, 2);
        assert!(sasol.last_matched.is_some());
        let engen = records.iter().find(|p| p.pattern == "engen").unwrap();
        assert_eq!(engen.match_count, 0);
    }

    #[test]
    fn test_threshold_bounds() {
        let mut store = PatternStore::new();
        assert!(store.set_threshold(1.2).is_err());
        store.set_threshold(0.5).unwrap();
        assert_eq!(store.settings().confidence_threshold, 0.5);
    }

    #[test]
    fn test_save_and_load_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let mut store = motors_store();
        store.create_category("home", "", None).unwrap();
        store.create_label("home", "rent", "", &terms(&["rent payment"]), &[]).unwrap();
        store.save(&path).unwrap();

        let loaded = PatternStore::load(&path).unwrap();
        let labels: Vec<String> = loaded.list_active_labels().into_iter().map(|v| v.label).collect();
        assert_eq!(labels, vec!["fuel", "rent"]);
        assert_eq!(loaded.patterns(None, None).len(), 3);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PatternStore::load(&dir.path().join("missing.json")).unwrap();
        assert!(store.list_categories().is_empty());
        assert_eq!(store.settings().confidence_threshold, 0.7);
    }

    #[test]
    fn test_load_repairs_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let json = r#"{
            "categories": [{"name": "Motors"}],
            "labels": [
                {"name": "Fuel", "category": "MOTORS", "patterns": ["SASOL", "sasol", " "], "keywords": ["Petrol"]},
                {"name": "ghost", "category": "nowhere"}
            ],
            "patterns": [{"pattern": "bp", "category": "motors", "label": "fuel"}]
        }"#;
        std::fs::write(&path, json).unwrap();
        let store = PatternStore::load(&path).unwrap();
        let label = store.get_label("motors", "fuel").unwrap();
        assert_eq!(label.patterns, vec!["sasol"]);
        assert_eq!(label.keywords, vec!["petrol"]);
        assert_eq!(store.list_labels(None).unwrap().len(), 1);
        let records = store.patterns(None, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pattern, "sasol");
        assert!(store.settings().auto_learn);
    }

    #[test]
    fn test_load_merges_case_colliding_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let json = r#"{
            "categories": [{"name": "Home"}, {"name": "home", "description": "House costs"}],
            "labels": [
                {"name": "Rent", "category": "home", "patterns": ["landlord"], "keywords": ["rent"]},
                {"name": "rent", "category": "HOME", "patterns": ["Landlord", "lease"], "keywords": ["monthly"]}
            ],
            "patterns": [
                {"pattern": "landlord", "category": "home", "label": "rent", "match_count": 2},
                {"pattern": "LANDLORD", "category": "home", "label": "Rent", "match_count": 3}
            ]
        }"#;
        std::fs::write(&path, json).unwrap();
        let store = PatternStore::load(&path).unwrap();

        assert_eq!(store.list_categories().len(), 1);
        assert_eq!(store.get_category("home").unwrap().description, "House costs");
        assert_eq!(store.list_labels(None).unwrap().len(), 1);
        let label = store.get_label("home", "rent").unwrap();
        assert_eq!(label.patterns, vec!["landlord", "lease"]);
        assert_eq!(label.keywords, vec!["rent", "monthly"]);
        assert_eq!(store.list_active_labels().len(), 1);

        let records = store.patterns(Some("home"), Some("rent"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].match_count, 5);
    }

    #[test]
    fn test_merged_category_deletes_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let json = r#"{"categories": [{"name": "Pets"}, {"name": "PETS"}], "labels": []}"#;
        std::fs::write(&path, json).unwrap();
        let mut store = PatternStore::load(&path).unwrap();
        store.delete_category("pets", false).unwrap();
        assert!(store.get_category("pets").is_none());
        assert!(store.list_categories().is_empty());
    }

    #[test]
    fn test_statistics() {
        let mut store = motors_store();
        store.create_category("home", "", None).unwrap();
        let stats = store.statistics();
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.labels, 1);
        assert_eq!(stats.patterns, 2);
        assert_eq!(
            stats.labels_per_category,
            vec![("motors".to_string(), 1), ("home".to_string(), 0)]
        );
    }
}
