//! Configuration loading and discovery for `sheetcut.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{AlphaConfig, CutConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "sheetcut.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse sheetcut.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub sheet: Option<PathBuf>,
    pub tile_size: Option<[u32; 2]>,
    pub padding: Option<u32>,
    pub margin: Option<u32>,
    pub alpha: Option<AlphaConfig>,
    pub verbose: Option<bool>,
    /// Override export directory
    pub out: Option<PathBuf>,
    /// Override export file name
    pub name: Option<String>,
}

/// Find sheetcut.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find sheetcut.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// Loads `path` if given, otherwise the discovered config file. Relative paths
/// inside the file are resolved against the file's directory. Without any
/// config file a default configuration is returned.
///
/// # Returns
/// - `Ok((config, Some(path)))` when a file was loaded
/// - `Ok((default, None))` when no file was found
/// - `Err(ConfigError)` if the file cannot be read, parsed or validated
pub fn load_config(path: Option<&Path>) -> Result<(CutConfig, Option<PathBuf>), ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            let config = load_config_file(&p)?;
            Ok((config, Some(p)))
        }
        None => Ok((CutConfig::default(), None)),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CutConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: CutConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = path.parent() {
        config.sheet.path = config.sheet.path.map(|p| resolve_path(root, &p));
        config.export.directory = resolve_path(root, &config.export.directory);
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged config
/// is validated again.
pub fn merge_cli_overrides(
    config: &mut CutConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref sheet) = overrides.sheet {
        config.sheet.path = Some(sheet.clone());
    }
    if let Some(tile_size) = overrides.tile_size {
        config.sheet.tile_size = tile_size;
    }
    if let Some(padding) = overrides.padding {
        config.sheet.padding = padding;
    }
    if let Some(margin) = overrides.margin {
        config.sheet.margin = margin;
    }
    if let Some(ref alpha) = overrides.alpha {
        config.sheet.alpha = Some(alpha.clone());
    }
    if let Some(verbose) = overrides.verbose {
        config.sheet.verbose = verbose;
    }
    if let Some(ref out) = overrides.out {
        config.export.directory = out.clone();
    }
    if let Some(ref name) = overrides.name {
        config.export.name = name.clone();
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || project_root.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
