use std::path::PathBuf;

use colored::Colorize;

use crate::error::{InoutError, Result};
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::workspace::{is_workspace, Workspace};

pub fn run(dir: Option<String>, name: Option<String>, empty: bool) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = dir {
        settings.workspace_dir = shellexpand_path(&dir);
    }
    if let Some(name) = name {
        settings.user_name = name;
    }

    let resolved = PathBuf::from(&settings.workspace_dir);
    if is_workspace(&resolved) {
        save_settings(&settings)?;
        println!("Workspace already initialized at {}", resolved.display());
        return Ok(());
    }

    let ws = Workspace::init(&resolved, &settings.user_name, !empty)
        .map_err(|e| InoutError::Settings(format!("Could not create workspace: {e}")))?;
    save_settings(&settings)?;

    let stats = ws.store.statistics();
    println!("{}", format!("Initialized inout at {}", resolved.display()).green());
    println!("  {} categories, {} labels", stats.categories, stats.labels);
    Ok(())
}
