//! Confidence scoring for one label against one transaction description.
//!
//! Scores are additive and accumulate in hundredths so that the final value
//! compares exactly against thresholds such as `0.7`:
//!
//! | evidence                                   | weight |
//! |--------------------------------------------|--------|
//! | each pattern found in the description      | 0.4    |
//! | each keyword found in the description      | 0.2    |
//! | the label's own name found                 | 0.3    |
//! | amount falls in the category's bucket      | 0.1    |
//!
//! The total is clamped to 1.0. Matching is plain unanchored substring search
//! on lowercased text, so a short pattern like `bp` also hits `superb plan`.

pub const PATTERN_WEIGHT: u32 = 40;
pub const KEYWORD_WEIGHT: u32 = 20;
pub const NAME_WEIGHT: u32 = 30;
pub const AMOUNT_BONUS: u32 = 10;
const MAX_UNITS: u32 = 100;

/// The matching vocabulary of one active label, as handed to the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVocabulary {
    pub category: String,
    pub label: String,
    pub patterns: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    units: u32,
    pub matched_patterns: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub name_matched: bool,
    pub amount_bonus: bool,
}

impl MatchScore {
    /// Clamped score in `[0.0, 1.0]`.
    pub fn value(&self) -> f64 {
        f64::from(self.units.min(MAX_UNITS)) / f64::from(MAX_UNITS)
    }

    /// Clamped score in hundredths, used for exact comparisons.
    pub fn units(&self) -> u32 {
        self.units.min(MAX_UNITS)
    }
}

/// Score `vocab` against an already normalised (trimmed, lowercased) description.
pub fn score(description: &str, amount: Option<f64>, vocab: &LabelVocabulary) -> MatchScore {
    let mut units = 0u32;

    let matched_patterns: Vec<String> = vocab
        .patterns
        .iter()
        .filter(|p| !p.is_empty() && description.contains(p.as_str()))
        .cloned()
        .collect();
    units += PATTERN_WEIGHT * matched_patterns.len() as u32;

    let matched_keywords: Vec<String> = vocab
        .keywords
        .iter()
        .filter(|k| !k.is_empty() && description.contains(k.as_str()))
        .cloned()
        .collect();
    units += KEYWORD_WEIGHT * matched_keywords.len() as u32;

    let name_matched = !vocab.label.is_empty() && description.contains(vocab.label.as_str());
    if name_matched {
        units += NAME_WEIGHT;
    }

    let amount_bonus = amount.is_some_and(|a| in_amount_bucket(&vocab.category, a));
    if amount_bonus {
        units += AMOUNT_BONUS;
    }

    MatchScore {
        units,
        matched_patterns,
        matched_keywords,
        name_matched,
        amount_bonus,
    }
}

/// Typical-spend buckets. Only strictly positive amounts qualify, and a
/// category can sit in at most one bucket.
pub fn in_amount_bucket(category: &str, amount: f64) -> bool {
    if amount <= 0.0 {
        return false;
    }
    match category {
        "groceries" | "home" => amount > 200.0,
        "motors" => amount > 100.0,
        "data_communication" => amount > 50.0 && amount < 1000.0,
        _ => false,
    }
}
