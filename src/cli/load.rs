use std::path::PathBuf;

use crate::error::{InoutError, Result};
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::workspace::{is_workspace, INFO_FILE};

pub fn run(path: &str) -> Result<()> {
    let resolved = PathBuf::from(shellexpand_path(path));

    if !is_workspace(&resolved) {
        return Err(InoutError::Settings(format!(
            "No {INFO_FILE} found in {}\nRun `inout init --dir {}` to create a workspace there.",
            resolved.display(),
            resolved.display()
        )));
    }

    let mut settings = load_settings();
    settings.workspace_dir = resolved.to_string_lossy().to_string();
    save_settings(&settings)?;

    println!("Switched to {}", resolved.display());
    Ok(())
}
