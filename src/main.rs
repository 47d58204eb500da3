mod budget;
mod categorizer;
mod cli;
mod currency;
mod error;
mod fmt;
mod importer;
mod ledger;
mod models;
mod reviewer;
mod scorer;
mod seed;
mod settings;
mod store;
mod validate;
mod workspace;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::{
    BudgetsCommands, CategoriesCommands, Cli, Commands, CurrencyCommands, KeywordsCommands, LabelsCommands,
    PatternsCommands, SettingsCommands, TransactionsCommands,
};
use ledger::TransactionFilter;

fn main() {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let dir = settings::resolve_workspace(cli.workspace.as_deref(), &settings::load_settings());

    let result = match cli.command {
        Commands::Init { dir: init_dir, name, empty } => {
            let target = init_dir.or_else(|| cli.workspace.map(|p| p.to_string_lossy().to_string()));
            cli::init::run(target, name, empty)
        }
        Commands::Load { path } => cli::load::run(&path),
        Commands::Status => cli::status::run(&dir),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(&dir),
            CategoriesCommands::Add {
                name,
                description,
                color,
            } => cli::categories::add(&dir, &name, &description, color.as_deref()),
            CategoriesCommands::Update { name, field, value } => {
                cli::categories::update(&dir, &name, &field, &value)
            }
            CategoriesCommands::Rename { old, new } => cli::categories::rename(&dir, &old, &new),
            CategoriesCommands::Delete { name, force } => cli::categories::delete(&dir, &name, force),
        },
        Commands::Labels { command } => match command {
            LabelsCommands::List { category } => cli::labels::list(&dir, category.as_deref()),
            LabelsCommands::Add {
                category,
                name,
                description,
                patterns,
                keywords,
            } => cli::labels::add(&dir, &category, &name, &description, &patterns, &keywords),
            LabelsCommands::Update {
                category,
                name,
                field,
                value,
            } => cli::labels::update(&dir, &category, &name, &field, &value),
            LabelsCommands::Rename { category, old, new } => cli::labels::rename(&dir, &category, &old, &new),
            LabelsCommands::Delete { category, name, force } => {
                cli::labels::delete(&dir, &category, &name, force)
            }
        },
        Commands::Patterns { command } => match command {
            PatternsCommands::List { category, label } => {
                cli::patterns::list(&dir, category.as_deref(), label.as_deref())
            }
            PatternsCommands::Add {
                category,
                label,
                pattern,
                confidence,
            } => cli::patterns::add(&dir, &category, &label, &pattern, confidence),
            PatternsCommands::Remove {
                category,
                label,
                pattern,
            } => cli::patterns::remove(&dir, &category, &label, &pattern),
        },
        Commands::Keywords { command } => match command {
            KeywordsCommands::Add {
                category,
                label,
                keyword,
            } => cli::patterns::add_keyword(&dir, &category, &label, &keyword),
            KeywordsCommands::Remove {
                category,
                label,
                keyword,
            } => cli::patterns::remove_keyword(&dir, &category, &label, &keyword),
        },
        Commands::Categorize {
            description,
            amount,
            threshold,
        } => cli::categorize::run(&dir, &description, amount, threshold),
        Commands::Recategorize { all, threshold } => cli::categorize::recategorize(&dir, all, threshold),
        Commands::Import {
            file,
            currency,
            entity,
            no_categorize,
        } => cli::import::run(&dir, &file, currency.as_deref(), entity.as_deref(), no_categorize),
        Commands::Transactions { command } => match command {
            TransactionsCommands::List {
                category,
                label,
                entity,
                from,
                to,
                uncategorized,
            } => cli::transactions::list(
                &dir,
                TransactionFilter {
                    category,
                    label,
                    entity,
                    from,
                    to,
                    uncategorized,
                },
            ),
            TransactionsCommands::Add {
                date,
                description,
                amount,
                category,
                label,
                entity,
                currency,
                reference,
                auto,
            } => cli::transactions::add(
                &dir,
                &date,
                &description,
                &amount,
                category,
                label,
                entity,
                currency,
                reference,
                auto,
            ),
            TransactionsCommands::Summary => cli::transactions::summary(&dir),
        },
        Commands::Review => cli::review::run(&dir),
        Commands::Budgets { command } => match command {
            BudgetsCommands::List => cli::budgets::list(&dir),
            BudgetsCommands::Set {
                category,
                amount,
                period,
                entity,
                replace,
            } => cli::budgets::set(&dir, &category, amount, &period, entity.as_deref(), replace),
            BudgetsCommands::Remove { category, entity } => cli::budgets::remove(&dir, &category, entity.as_deref()),
            BudgetsCommands::Status { as_of } => cli::budgets::status(&dir, as_of.as_deref()),
        },
        Commands::Currency { command } => match command {
            CurrencyCommands::List => cli::currency::list(&dir),
            CurrencyCommands::Convert { amount, from, to } => cli::currency::convert(&dir, amount, &from, &to),
            CurrencyCommands::Add {
                code,
                symbol,
                name,
                rate,
                decimals,
            } => cli::currency::add(&dir, &code, &symbol, &name, rate, decimals),
            CurrencyCommands::SetRate { code, rate } => cli::currency::set_rate(&dir, &code, rate),
            CurrencyCommands::Default { code } => cli::currency::set_default(&dir, &code),
        },
        Commands::Export {
            output,
            skip_categories,
            skip_transactions,
            skip_budgets,
        } => cli::export::run(
            &dir,
            output.as_deref(),
            workspace::ExportSections {
                categories: !skip_categories,
                transactions: !skip_transactions,
                budgets: !skip_budgets,
            },
        ),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => cli::settings::show(&dir),
            SettingsCommands::SetThreshold { threshold } => cli::settings::set_threshold(&dir, threshold),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "inout", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
