//! Export command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{open_sheet, SheetArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::index::SpriteIndex;

/// Execute the export command
pub fn run_export(
    config: Option<&Path>,
    args: &SheetArgs,
    index: Option<&str>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> ExitCode {
    let index = match index.map(str::parse::<SpriteIndex>).transpose() {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: --index: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let overrides = CliOverrides {
        out: output,
        name,
        ..Default::default()
    };
    let (sheet, config) = match open_sheet(config, args, overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let directory = &config.export.directory;
    match sheet.export(index.map(Into::into), &config.export.name, directory) {
        Ok(count) => {
            println!(
                "Exported {} file{} to {}",
                count,
                if count == 1 { "" } else { "s" },
                directory.display()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
