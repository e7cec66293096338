//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod info;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::color::parse_color_key;
use crate::config::{load_config, merge_cli_overrides, AlphaConfig, CliOverrides, CutConfig};
use crate::sheet::SpriteSheet;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// sheetcut - Slice spritesheets into tiles and export them as PNG
#[derive(Parser)]
#[command(name = "sheetcut")]
#[command(about = "Slice spritesheets into tile grids and export tiles as PNG")]
#[command(version)]
pub struct Cli {
    /// Config file (default: nearest sheetcut.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options describing how to slice the sheet; each overrides `[sheet]` in the config.
#[derive(Args, Debug, Clone, Default)]
pub struct SheetArgs {
    /// Spritesheet image
    pub sheet: Option<PathBuf>,

    /// Tile size, e.g. "16x16" or "16"
    #[arg(long, value_parser = parse_tile_size)]
    pub tile: Option<[u32; 2]>,

    /// Gap in pixels on each side of every tile
    #[arg(long)]
    pub padding: Option<u32>,

    /// Border in pixels around the whole grid
    #[arg(long)]
    pub margin: Option<u32>,

    /// Background key: "x,y" samples a pixel, "r,g,b" or a CSS color sets it
    #[arg(long, value_parser = parse_alpha)]
    pub alpha: Option<AlphaConfig>,

    /// Describe loading, extraction and export on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show grid dimensions, sprite count and an occupancy map
    Info {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export tiles as PNG files
    Export {
        #[command(flatten)]
        sheet: SheetArgs,

        /// What to export: "r", "r,c", "r,a:b", "a:b,c", "a:b,c:d" or a group name.
        /// Exports every tile when omitted.
        #[arg(short, long)]
        index: Option<String>,

        /// File name stem (single tile: {name}.png, otherwise {name}_{row}_{col}.png)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory, created if missing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse "WxH" or a single number for square tiles.
fn parse_tile_size(s: &str) -> Result<[u32; 2], String> {
    let parse = |v: &str| {
        v.trim().parse::<u32>().map_err(|_| format!("invalid tile dimension '{}'", v))
    };
    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok([parse(w)?, parse(h)?]),
        None => {
            let side = parse(s)?;
            Ok([side, side])
        }
    }
}

/// Parse "x,y", "r,g,b" or a color string.
fn parse_alpha(s: &str) -> Result<AlphaConfig, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let numeric = parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    match parts.as_slice() {
        [x, y] if numeric => {
            let coord = |v: &str| v.parse::<u32>().map_err(|_| format!("invalid coordinate '{}'", v));
            Ok(AlphaConfig::Coordinate([coord(x)?, coord(y)?]))
        }
        [r, g, b] if numeric => {
            let channel = |v: &str| v.parse::<u8>().map_err(|_| format!("invalid channel '{}'", v));
            Ok(AlphaConfig::Rgb([channel(r)?, channel(g)?, channel(b)?]))
        }
        _ => parse_color_key(s)
            .map(|_| AlphaConfig::Color(s.to_string()))
            .map_err(|e| e.to_string()),
    }
}

/// Load config, apply overrides, open the sheet and register config groups.
///
/// Errors are printed; the returned code is the one to exit with.
pub(crate) fn open_sheet(
    config_path: Option<&Path>,
    args: &SheetArgs,
    mut overrides: CliOverrides,
) -> Result<(SpriteSheet, CutConfig), ExitCode> {
    let (mut config, _) = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;

    overrides.sheet = args.sheet.clone();
    overrides.tile_size = args.tile;
    overrides.padding = args.padding;
    overrides.margin = args.margin;
    overrides.alpha = args.alpha.clone();
    if args.verbose {
        overrides.verbose = Some(true);
    }
    merge_cli_overrides(&mut config, &overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;

    let Some(path) = config.sheet.path.clone() else {
        eprintln!("Error: No spritesheet given (pass a path or set [sheet].path in sheetcut.toml)");
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    };

    let mut sheet = SpriteSheet::open(&path, config.sheet_options()).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;

    for (name, index) in config.parsed_groups() {
        if let Err(e) = sheet.name(index, name) {
            eprintln!("Error: group '{}': {}", name, e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    }

    Ok((sheet, config))
}

/// Parse command-line arguments and run the selected command
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Info { sheet, json } => info::run_info(config, &sheet, json),
        Commands::Export {
            sheet,
            index,
            name,
            output,
        } => export::run_export(config, &sheet, index.as_deref(), name, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_size() {
        assert_eq!(parse_tile_size("16x8"), Ok([16, 8]));
        assert_eq!(parse_tile_size("32"), Ok([32, 32]));
        assert_eq!(parse_tile_size(" 4 X 4 "), Ok([4, 4]));
        assert!(parse_tile_size("16x").is_err());
        assert!(parse_tile_size("big").is_err());
    }

    #[test]
    fn test_parse_alpha() {
        assert_eq!(parse_alpha("0,0"), Ok(AlphaConfig::Coordinate([0, 0])));
        assert_eq!(parse_alpha("255, 0, 255"), Ok(AlphaConfig::Rgb([255, 0, 255])));
        assert_eq!(parse_alpha("#F0F"), Ok(AlphaConfig::Color("#F0F".to_string())));
        assert!(parse_alpha("256,0,0").is_err());
        assert!(parse_alpha("#nope").is_err());
    }

    #[test]
    fn test_parse_alpha_css_with_commas() {
        assert_eq!(
            parse_alpha("rgb(255, 0, 255)"),
            Ok(AlphaConfig::Color("rgb(255, 0, 255)".to_string()))
        );
        assert_eq!(
            parse_alpha("hsl(300, 100%, 50%)"),
            Ok(AlphaConfig::Color("hsl(300, 100%, 50%)".to_string()))
        );
        assert!(parse_alpha("1,x").is_err());
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "sheetcut", "export", "sheet.png", "--tile", "8x8", "-i", "0:2,1", "-n", "col", "-o",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                sheet,
                index,
                name,
                output,
            } => {
                assert_eq!(sheet.sheet, Some(PathBuf::from("sheet.png")));
                assert_eq!(sheet.tile, Some([8, 8]));
                assert_eq!(index.as_deref(), Some("0:2,1"));
                assert_eq!(name.as_deref(), Some("col"));
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            _ => panic!("expected export command"),
        }
    }
}
