use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::{Confirm, Input};

use crate::error::Result;
use crate::reviewer::{apply_review, get_label_choices, get_uncategorized, parse_choice, suggest_pattern, ReviewAction};

use super::open;

pub fn run(dir: &Path) -> Result<()> {
    let mut ws = open(dir)?;
    let pending = get_uncategorized(&ws);

    if pending.is_empty() {
        println!("{}", "No uncategorized transactions to review.".green());
        return Ok(());
    }

    let choices = get_label_choices(&ws);
    if choices.is_empty() {
        println!("{}", "No active labels. Add one with `inout labels add`.".yellow());
        return Ok(());
    }
    println!("\n{} transactions to review\n", pending.len());

    let mut label_table = Table::new();
    label_table.set_header(vec!["#", "Category", "Label"]);
    for (i, choice) in choices.iter().enumerate() {
        label_table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&choice.category),
            Cell::new(&choice.label),
        ]);
    }
    println!("Labels\n{label_table}\n");

    for txn in &pending {
        println!("{}", "\u{2500}".repeat(60));
        println!("  Date:        {}", txn.date);
        println!("  Description: {}", txn.description);
        let amount = ws.currencies.format(txn.amount, &txn.currency);
        let amt_str = if txn.amount < 0.0 {
            amount.red().to_string()
        } else {
            amount.green().to_string()
        };
        println!("  Amount:      {amt_str}");
        if let Some(entity) = &txn.entity {
            println!("  Entity:      {entity}");
        }
        println!();

        let input = Input::<String>::new()
            .with_prompt("Label # (or s=skip, q=quit)")
            .interact_text()
            .ok();

        let idx = match parse_choice(input.as_deref(), choices.len()) {
            ReviewAction::Pick(idx) => idx,
            ReviewAction::Skip => continue,
            ReviewAction::Invalid => {
                println!("{}", "Invalid choice, skipping.".red());
                continue;
            }
            ReviewAction::Quit => {
                ws.save()?;
                println!("{}", "Review paused.".yellow());
                return Ok(());
            }
        };
        let picked = &choices[idx];

        let learn = Confirm::new()
            .with_prompt("Add a pattern for future matches?")
            .default(false)
            .interact()
            .unwrap_or(false);

        let mut pattern = None;
        if learn {
            let entered: String = Input::new()
                .with_prompt("Pattern")
                .default(suggest_pattern(&txn.description))
                .interact_text()
                .unwrap_or_default();
            pattern = Some(entered);
        }

        apply_review(&mut ws, &txn.id, picked, pattern.as_deref())?;
        println!(
            "{}",
            format!("\u{2192} Categorized as {}/{}", picked.category, picked.label).green()
        );
        println!();
    }

    ws.save()?;
    println!("{}", "Review complete!".green());
    Ok(())
}
