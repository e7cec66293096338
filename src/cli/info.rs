//! Info command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{open_sheet, SheetArgs, EXIT_SUCCESS};
use crate::color::format_color_key;
use crate::config::CliOverrides;
use crate::sheet::SpriteSheet;

/// Occupancy map: one line per row, `#` for tiles and `.` for background.
pub(crate) fn occupancy_map(sheet: &SpriteSheet) -> Vec<String> {
    sheet
        .grid()
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| if cell.is_some() { '#' } else { '.' }).collect())
        .collect()
}

fn summary_json(sheet: &SpriteSheet) -> serde_json::Value {
    let (width, height) = sheet.dimensions();
    let (tile_w, tile_h) = sheet.tile_size();
    let tiles: Vec<serde_json::Value> = sheet
        .tiles()
        .map(|t| {
            serde_json::json!({
                "row": t.row(),
                "column": t.column(),
                "rect": t.rect(),
            })
        })
        .collect();

    serde_json::json!({
        "sheet": sheet.path().map(|p| p.display().to_string()),
        "size": [width, height],
        "tile_size": [tile_w, tile_h],
        "padding": sheet.padding(),
        "margin": sheet.margin(),
        "rows": sheet.row_count(),
        "columns": sheet.column_count(),
        "sprite_count": sheet.sprite_count(),
        "background": sheet.background().map(format_color_key),
        "groups": sheet.group_names(),
        "tiles": tiles,
    })
}

/// Execute the info command
pub fn run_info(config: Option<&Path>, args: &SheetArgs, json: bool) -> ExitCode {
    let (sheet, _) = match open_sheet(config, args, CliOverrides::default()) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    if json {
        println!("{}", summary_json(&sheet));
        return ExitCode::from(EXIT_SUCCESS);
    }

    let (width, height) = sheet.dimensions();
    let (tile_w, tile_h) = sheet.tile_size();
    let cells = sheet.row_count() * sheet.column_count();

    if let Some(path) = sheet.path() {
        println!("Sheet:      {} ({}x{})", path.display(), width, height);
    }
    println!(
        "Tiles:      {}x{} (padding {}, margin {})",
        tile_w,
        tile_h,
        sheet.padding(),
        sheet.margin()
    );
    println!("Grid:       {} rows x {} columns", sheet.row_count(), sheet.column_count());
    println!(
        "Sprites:    {} ({} transparent)",
        sheet.sprite_count(),
        cells - sheet.sprite_count()
    );
    match sheet.background() {
        Some(key) => println!("Background: {}", format_color_key(key)),
        None => println!("Background: per-pixel alpha"),
    }
    let groups = sheet.group_names();
    if !groups.is_empty() {
        println!("Groups:     {}", groups.join(", "));
    }

    println!();
    let label_width = sheet.row_count().saturating_sub(1).to_string().len();
    for (row, line) in occupancy_map(&sheet).iter().enumerate() {
        println!("  {:>width$}  {}", row, line, width = label_width);
    }

    ExitCode::from(EXIT_SUCCESS)
}
