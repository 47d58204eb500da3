use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::workspace::ExportSections;

use super::open;

pub fn run(dir: &Path, output: Option<&Path>, sections: ExportSections) -> Result<()> {
    let ws = open(dir)?;
    let path = ws.export(output, sections)?;
    println!("{}", format!("Exported to {}", path.display()).green());
    Ok(())
}
