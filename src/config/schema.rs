//! Configuration schema types for `sheetcut.toml`
//!
//! ```toml
//! [sheet]
//! path = "assets/dungeon.png"
//! tile_size = [16, 16]
//! padding = 1
//! alpha = "#FF00FF"      # or [x, y] to sample, or [r, g, b]
//!
//! [export]
//! directory = "png"
//! name = "tile"
//!
//! [groups]
//! walls = "0"
//! doors = "1,0:4"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use image::Rgb;

use crate::alpha::AlphaSpec;
use crate::color::{parse_color_key, ColorError};
use crate::index::{is_numeric_syntax, GridIndex};
use crate::sheet::{SheetOptions, DEFAULT_EXPORT_DIR, DEFAULT_EXPORT_NAME};

/// How the background is written in config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphaConfig {
    /// `[x, y]` - sample the key from this pixel
    Coordinate([u32; 2]),
    /// `[r, g, b]` - explicit key
    Rgb([u8; 3]),
    /// Any CSS color string
    Color(String),
}

impl AlphaConfig {
    /// Convert to the [`AlphaSpec`] used when constructing a sheet.
    pub fn to_spec(&self) -> Result<AlphaSpec, ColorError> {
        match self {
            AlphaConfig::Coordinate([x, y]) => Ok(AlphaSpec::Pixel { x: *x, y: *y }),
            AlphaConfig::Rgb(rgb) => Ok(AlphaSpec::Color(Rgb(*rgb))),
            AlphaConfig::Color(s) => parse_color_key(s).map(AlphaSpec::Color),
        }
    }
}

/// `[sheet]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Sheet image; relative paths are resolved against the config file
    pub path: Option<PathBuf>,
    /// Tile dimensions [width, height]
    #[serde(default = "default_tile_size")]
    pub tile_size: [u32; 2],
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<AlphaConfig>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: None,
            tile_size: default_tile_size(),
            padding: 0,
            margin: 0,
            alpha: None,
            verbose: false,
        }
    }
}

fn default_tile_size() -> [u32; 2] {
    [16, 16]
}

/// `[export]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_export_name")]
    pub name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
            name: default_export_name(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

fn default_export_name() -> String {
    DEFAULT_EXPORT_NAME.to_string()
}

/// Complete `sheetcut.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CutConfig {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub export: ExportConfig,
    /// Group name -> grid index string
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
}

/// Config validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "groups.walls")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sheetcut.toml: '{}' {}", self.field, self.message)
    }
}

impl CutConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.sheet.tile_size[0] == 0 || self.sheet.tile_size[1] == 0 {
            errors.push(ConfigValidationError {
                field: "sheet.tile_size".to_string(),
                message: "dimensions must be positive".to_string(),
            });
        }

        if let Some(alpha) = &self.sheet.alpha {
            if let Err(e) = alpha.to_spec() {
                errors.push(ConfigValidationError {
                    field: "sheet.alpha".to_string(),
                    message: e.to_string(),
                });
            }
        }

        if self.export.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "export.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        for (name, index) in &self.groups {
            if name.trim().is_empty() || is_numeric_syntax(name.trim()) {
                errors.push(ConfigValidationError {
                    field: format!("groups.{}", name),
                    message: "group names must not be empty or look like a grid index".to_string(),
                });
            }
            if let Err(e) = index.parse::<GridIndex>() {
                errors.push(ConfigValidationError {
                    field: format!("groups.{}", name),
                    message: format!("is not a grid index: {}", e),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Sheet construction options described by this config.
    ///
    /// Call on validated configs only; an unparseable alpha is treated as absent.
    pub fn sheet_options(&self) -> SheetOptions {
        let [w, h] = self.sheet.tile_size;
        SheetOptions {
            tile_size: (w, h),
            padding: self.sheet.padding,
            margin: self.sheet.margin,
            alpha: self.sheet.alpha.as_ref().and_then(|a| a.to_spec().ok()),
            verbose: self.sheet.verbose,
        }
    }

    /// Groups in name order, with their parsed indices.
    pub fn parsed_groups(&self) -> Vec<(&str, GridIndex)> {
        self.groups
            .iter()
            .filter_map(|(name, index)| index.parse().ok().map(|i| (name.as_str(), i)))
            .collect()
    }
}
