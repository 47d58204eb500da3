use crate::error::Result;
use crate::models::Transaction;
use crate::workspace::Workspace;

/// One pickable (category, label) pair in the review menu.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelChoice {
    pub category: String,
    pub label: String,
}

pub fn get_uncategorized(ws: &Workspace) -> Vec<Transaction> {
    ws.ledger
        .transactions()
        .iter()
        .filter(|t| !t.is_categorized())
        .cloned()
        .collect()
}

/// Active labels in scan order, which is also the menu order.
pub fn get_label_choices(ws: &Workspace) -> Vec<LabelChoice> {
    ws.store
        .list_active_labels()
        .into_iter()
        .map(|v| LabelChoice {
            category: v.category,
            label: v.label,
        })
        .collect()
}

/// What the reviewer asked for at the label prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Pick(usize),
    Skip,
    Quit,
    Invalid,
}

/// Interpret the label prompt. `None` means the prompt could not be read
/// (closed stdin, no terminal), which ends the review.
pub fn parse_choice(input: Option<&str>, choice_count: usize) -> ReviewAction {
    let Some(input) = input else {
        return ReviewAction::Quit;
    };
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return ReviewAction::Quit;
    }
    if input.eq_ignore_ascii_case("s") {
        return ReviewAction::Skip;
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= choice_count => ReviewAction::Pick(n - 1),
        _ => ReviewAction::Invalid,
    }
}

/// First two words of the description, lowercased.
pub fn suggest_pattern(description: &str) -> String {
    description
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Assign the transaction and, when given, teach the label a new pattern.
/// Returns whether a pattern was added.
pub fn apply_review(
    ws: &mut Workspace,
    transaction_id: &str,
    choice: &LabelChoice,
    new_pattern: Option<&str>,
) -> Result<bool> {
    ws.assign(transaction_id, &choice.category, &choice.label)?;
    match new_pattern {
        Some(p) if !p.trim().is_empty() => ws.store.add_pattern(&choice.category, &choice.label, p, None),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn test_ws() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::init(dir.path(), "", false).unwrap();
        ws.store.create_category("home", "", None).unwrap();
        ws.store.create_label("home", "rent", "", &[], &["rent".to_string()]).unwrap();
        ws.store.create_label("home", "garden", "", &[], &[]).unwrap();
        for (date, desc) in [("2024-01-01", "LANDLORD PTY LTD"), ("2024-01-02", "STODELS NURSERY")] {
            ws.add_transaction(NewTransaction {
                date: date.into(),
                description: desc.into(),
                amount: -100.0,
                ..Default::default()
            })
            .unwrap();
        }
        (dir, ws)
    }

    #[test]
    fn test_get_uncategorized() {
        let (_dir, ws) = test_ws();
        assert_eq!(get_uncategorized(&ws).len(), 2);
    }

    #[test]
    fn test_label_choices_in_order() {
        let (_dir, ws) = test_ws();
        let labels: Vec<String> = get_label_choices(&ws).into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["rent", "garden"]);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(Some("2"), 3), ReviewAction::Pick(1));
        assert_eq!(parse_choice(Some(" S "), 3), ReviewAction::Skip);
        assert_eq!(parse_choice(Some("q"), 3), ReviewAction::Quit);
        assert_eq!(parse_choice(Some("0"), 3), ReviewAction::Invalid);
        assert_eq!(parse_choice(Some("4"), 3), ReviewAction::Invalid);
        assert_eq!(parse_choice(Some("fuel"), 3), ReviewAction::Invalid);
    }

    #[test]
    fn test_unreadable_prompt_ends_review() {
        assert_eq!(parse_choice(None, 3), ReviewAction::Quit);
    }

    #[test]
    fn test_suggest_pattern() {
        assert_eq!(suggest_pattern("STODELS NURSERY CAPE TOWN"), "stodels nursery");
        assert_eq!(suggest_pattern("UBER"), "uber");
        assert_eq!(suggest_pattern("   "), "");
    }

    #[test]
    fn test_apply_review_with_pattern() {
        let (_dir, mut ws) = test_ws();
        let txn = get_uncategorized(&ws)[1].clone();
        let choice = LabelChoice {
            category: "home".into(),
            label: "garden".into(),
        };
        assert!(apply_review(&mut ws, &txn.id, &choice, Some("stodels")).unwrap());
        assert!(ws.ledger.get(&txn.id).unwrap().is_categorized());
        assert_eq!(ws.store.get_label("home", "garden").unwrap().patterns, vec!["stodels"]);
        assert_eq!(get_uncategorized(&ws).len(), 1);
    }

    #[test]
    fn test_apply_review_without_pattern() {
        let (_dir, mut ws) = test_ws();
        let txn = get_uncategorized(&ws)[0].clone();
        let choice = LabelChoice {
            category: "home".into(),
            label: "rent".into(),
        };
        assert!(!apply_review(&mut ws, &txn.id, &choice, None).unwrap());
        assert!(ws.store.patterns(None, None).is_empty());
    }

    #[test]
    fn test_apply_review_unknown_label() {
        let (_dir, mut ws) = test_ws();
        let txn = get_uncategorized(&ws)[0].clone();
        let choice = LabelChoice {
            category: "home".into(),
            label: "pool".into(),
        };
        assert!(apply_review(&mut ws, &txn.id, &choice, None).is_err());
    }
}
