use tracing::debug;

use crate::error::{InoutError, Result};
use crate::ledger::Ledger;
use crate::scorer::{score, LabelVocabulary, MatchScore};
use crate::store::{CategorizerSettings, PatternStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorizerConfig {
    pub confidence_threshold: f64,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
        }
    }
}

impl From<&CategorizerSettings> for CategorizerConfig {
    fn from(settings: &CategorizerSettings) -> Self {
        Self {
            confidence_threshold: settings.confidence_threshold,
        }
    }
}

/// Outcome of one categorization. Both `category` and `label` are set, or
/// neither is and `confidence` is 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Option<String>,
    pub label: Option<String>,
    pub confidence: f64,
    pub matched_patterns: Vec<String>,
}

impl Classification {
    pub fn unclassified() -> Self {
        Self {
            category: None,
            label: None,
            confidence: 0.0,
            matched_patterns: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.category.is_some() && self.label.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Categorizer {
    config: CategorizerConfig,
}

impl Categorizer {
    pub fn new(config: CategorizerConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.confidence_threshold
    }

    /// Pick the best-scoring label for a description. Labels are scanned in
    /// order and a later label only wins on a strictly higher score.
    pub fn categorize(
        &self,
        labels: &[LabelVocabulary],
        description: &str,
        amount: Option<f64>,
    ) -> Result<Classification> {
        let normalized = description.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InoutError::InvalidArgument(
                "Description cannot be empty".into(),
            ));
        }

        let mut best: Option<(&LabelVocabulary, MatchScore)> = None;
        for vocab in labels {
            let candidate = score(&normalized, amount, vocab);
            let better = match &best {
                None => candidate.units() > 0,
                Some((_, current)) => candidate.units() > current.units(),
            };
            if better {
                best = Some((vocab, candidate));
            }
        }

        let Some((vocab, best)) = best else {
            debug!("No label matched '{normalized}'");
            return Ok(Classification::unclassified());
        };
        if best.value() < self.config.confidence_threshold {
            debug!(
                score = best.value(),
                threshold = self.config.confidence_threshold,
                "Best candidate {}/{} below threshold",
                vocab.category,
                vocab.label
            );
            return Ok(Classification::unclassified());
        }
        Ok(Classification {
            category: Some(vocab.category.clone()),
            label: Some(vocab.label.clone()),
            confidence: best.value(),
            matched_patterns: best.matched_patterns,
        })
    }
}

/// Categorize against the store's active labels and bump match statistics on
/// the winning label's patterns.
pub fn classify_and_record(
    store: &mut PatternStore,
    categorizer: &Categorizer,
    description: &str,
    amount: Option<f64>,
) -> Result<Classification> {
    let labels = store.list_active_labels();
    let result = categorizer.categorize(&labels, description, amount)?;
    if let (Some(category), Some(label)) = (&result.category, &result.label) {
        store.record_matches(category, label, &result.matched_patterns);
    }
    Ok(result)
}

pub struct CategorizeResult {
    pub categorized: usize,
    pub still_uncategorized: usize,
}

/// Run the categorizer over uncategorized transactions, or every transaction
/// when `all` is set. A transaction that finds no match keeps whatever
/// assignment it already had.
pub fn categorize_ledger(
    store: &mut PatternStore,
    ledger: &mut Ledger,
    categorizer: &Categorizer,
    all: bool,
) -> Result<CategorizeResult> {
    let labels = store.list_active_labels();
    let targets: Vec<(String, String, f64)> = ledger
        .transactions()
        .iter()
        .filter(|t| all || !t.is_categorized())
        .map(|t| (t.id.clone(), t.description.clone(), t.amount))
        .collect();

    let mut categorized = 0usize;
    for (id, description, amount) in &targets {
        let result = match categorizer.categorize(&labels, description, Some(*amount)) {
            Ok(r) => r,
            Err(InoutError::InvalidArgument(_)) => continue,
            Err(e) => return Err(e),
        };
        if let (Some(category), Some(label)) = (&result.category, &result.label) {
            ledger.assign(id, category, label, Some(result.confidence))?;
            store.record_matches(category, label, &result.matched_patterns);
            categorized += 1;
        }
    }

    let still_uncategorized = ledger
        .transactions()
        .iter()
        .filter(|t| !t.is_categorized())
        .count();
    debug!(categorized, still_uncategorized, "Batch categorization finished");
    Ok(CategorizeResult {
        categorized,
        still_uncategorized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn vocab(category: &str, label: &str, patterns: &[&str], keywords: &[&str]) -> LabelVocabulary {
        LabelVocabulary {
            category: category.to_string(),
            label: label.to_string(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn fuel_labels() -> Vec<LabelVocabulary> {
        vec![vocab("motors", "fuel", &["sasol", "engen"], &["fuel", "petrol"])]
    }

    fn categorizer(threshold: f64) -> Categorizer {
        Categorizer::new(CategorizerConfig {
            confidence_threshold: threshold,
        })
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sasol_fuel_scenario() {
        let c = categorizer(0.7);
        let result = c.categorize(&fuel_labels(), "SASOL FUEL PRETORIA", Some(250.0)).unwrap();
        assert_eq!(result.category.as_deref(), Some("motors"));
        assert_eq!(result.label.as_deref(), Some("fuel"));
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.matched_patterns, vec!["sasol"]);
    }

    #[test]
    fn test_no_match_scenario() {
        let c = categorizer(0.7);
        let result = c.categorize(&fuel_labels(), "RANDOM COFFEE SHOP", Some(50.0)).unwrap();
        assert_eq!(result, Classification::unclassified());
        assert!(!result.is_match());
    }

    #[test]
    fn test_empty_description_rejected() {
        let c = categorizer(0.7);
        assert!(matches!(
            c.categorize(&fuel_labels(), "", Some(0.0)).unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
        assert!(matches!(
            c.categorize(&fuel_labels(), "   \t", None).unwrap_err(),
            InoutError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_no_labels_is_unclassified() {
        let c = categorizer(0.0);
        let result = c.categorize(&[], "SASOL", None).unwrap();
        assert!(!result.is_match());
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        // 0.4 + 0.2 + 0.1 accumulates to exactly 0.7
        let labels = vec![vocab("motors", "tyres", &["hi-q"], &["tyre"])];
        let result = categorizer(0.7).categorize(&labels, "HI-Q TYRE FITMENT", Some(150.0)).unwrap();
        assert_eq!(result.label.as_deref(), Some("tyres"));
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let labels = fuel_labels();
        let descriptions = ["sasol", "engen petrol", "fuel", "sasol fuel", "nothing here"];
        let thresholds = [0.1, 0.3, 0.5, 0.7, 0.9, 1.0];
        for desc in descriptions {
            for pair in thresholds.windows(2) {
                let (low, high) = (pair[0], pair[1]);
                let at_high = categorizer(high).categorize(&labels, desc, None).unwrap();
                if at_high.is_match() {
                    let at_low = categorizer(low).categorize(&labels, desc, None).unwrap();
                    assert!(at_low.is_match(), "{desc} matched at {high} but not {low}");
                }
            }
        }
    }

    #[test]
    fn test_tie_goes_to_earliest_label() {
        let labels = vec![
            vocab("dad", "motors_transport", &["sasol"], &["fuel"]),
            vocab("mom", "errands", &["sasol"], &["fuel"]),
        ];
        let result = categorizer(0.5).categorize(&labels, "sasol fuel", None).unwrap();
        assert_eq!(result.category.as_deref(), Some("dad"));

        let reversed: Vec<_> = labels.into_iter().rev().collect();
        let result = categorizer(0.5).categorize(&reversed, "sasol fuel", None).unwrap();
        assert_eq!(result.category.as_deref(), Some("mom"));
    }

    #[test]
    fn test_higher_score_beats_earlier_label() {
        let labels = vec![
            vocab("dad", "motors_transport", &["sasol"], &[]),
            vocab("motors", "fuel", &["sasol"], &["fuel"]),
        ];
        let result = categorizer(0.5).categorize(&labels, "sasol fuel", None).unwrap();
        assert_eq!(result.label.as_deref(), Some("fuel"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let c = categorizer(0.7);
        let labels = fuel_labels();
        let first = c.categorize(&labels, "Engen Petrol Sandton", Some(300.0)).unwrap();
        for _ in 0..5 {
            assert_eq!(c.categorize(&labels, "Engen Petrol Sandton", Some(300.0)).unwrap(), first);
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let c = categorizer(0.7);
        let labels = fuel_labels();
        let a = c.categorize(&labels, "sasol fuel pretoria", Some(250.0)).unwrap();
        let b = c.categorize(&labels, "   SaSoL FuEl PRETORIA \n", Some(250.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_and_record_bumps_winner_only() {
        let mut store = PatternStore::new();
        store.create_category("motors", "", None).unwrap();
        store
            .create_label("motors", "fuel", "", &strings(&["sasol", "engen"]), &strings(&["fuel"]))
            .unwrap();
        store.create_category("dad", "", None).unwrap();
        store
            .create_label("dad", "transport", "", &strings(&["sasol"]), &[])
            .unwrap();

        let c = Categorizer::new(CategorizerConfig::from(store.settings()));
        let result = classify_and_record(&mut store, &c, "SASOL FUEL", None).unwrap();
        assert_eq!(result.label.as_deref(), Some("fuel"));

        let fuel = store.patterns(Some("motors"), Some("fuel"));
        assert_eq!(fuel.iter().find(|p| p.pattern == "sasol").unwrap().match_count, 1);
        assert_eq!(fuel.iter().find(|p| p.pattern == "engen").unwrap().match_count, 0);
        let dad = store.patterns(Some("dad"), None);
        assert_eq!(dad[0].match_count, 0);
    }

    #[test]
    fn test_statistics_do_not_change_scores() {
        let mut store = PatternStore::new();
        store.create_category("motors", "", None).unwrap();
        store
            .create_label("motors", "fuel", "", &strings(&["sasol"]), &strings(&["petrol"]))
            .unwrap();
        let c = categorizer(0.5);
        let first = classify_and_record(&mut store, &c, "sasol petrol", None).unwrap();
        let second = classify_and_record(&mut store, &c, "sasol petrol", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.patterns(None, None)[0].match_count, 2);
    }

    #[test]
    fn test_categorize_ledger() {
        let mut store = PatternStore::new();
        store.create_category("motors", "", None).unwrap();
        store
            .create_label("motors", "fuel", "", &strings(&["sasol", "engen"]), &strings(&["fuel"]))
            .unwrap();
        let mut ledger = Ledger::default();
        for (date, desc) in [("2024-01-02", "SASOL FUEL"), ("2024-01-03", "COFFEE"), ("2024-01-04", "ENGEN FUEL")] {
            ledger
                .add(NewTransaction {
                    date: date.into(),
                    description: desc.into(),
                    amount: -300.0,
                    ..Default::default()
                })
                .unwrap();
        }

        let c = categorizer(0.5);
        let result = categorize_ledger(&mut store, &mut ledger, &c, false).unwrap();
        assert_eq!(result.categorized, 2);
        assert_eq!(result.still_uncategorized, 1);
        let fuel: Vec<_> = ledger
            .transactions()
            .iter()
            .filter(|t| t.label.as_deref() == Some("fuel"))
            .collect();
        assert_eq!(fuel.len(), 2);
        assert_eq!(fuel[0].confidence, Some(0.9));

        // Only the coffee row is left to scan
        let again = categorize_ledger(&mut store, &mut ledger, &c, false).unwrap();
        assert_eq!(again.categorized, 0);
        assert_eq!(store.patterns(None, Some("fuel"))[0].match_count, 1);
    }

    #[test]
    fn test_categorize_ledger_all_keeps_manual_assignment_on_miss() {
        let mut store = PatternStore::new();
        store.create_category("other", "", None).unwrap();
        store.create_label("other", "misc", "", &[], &[]).unwrap();
        let mut ledger = Ledger::default();
        ledger
            .add(NewTransaction {
                date: "2024-02-01".into(),
                description: "FLEA MARKET".into(),
                amount: -20.0,
                category: Some("other".into()),
                label: Some("misc".into()),
                ..Default::default()
            })
            .unwrap();
        let result = categorize_ledger(&mut store, &mut ledger, &categorizer(0.7), true).unwrap();
        assert_eq!(result.categorized, 0);
        assert_eq!(result.still_uncategorized, 0);
        assert_eq!(ledger.transactions()[0].label.as_deref(), Some("misc"));
    }
}
