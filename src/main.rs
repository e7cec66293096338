//! sheetcut - Command-line tool for slicing spritesheets and exporting tiles

use std::process::ExitCode;

use sheetcut::cli;

fn main() -> ExitCode {
    cli::run()
}
