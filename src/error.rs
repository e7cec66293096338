//! Error types shared by sheet construction, indexing and export

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::output::OutputError;

/// Grid or pixel axis an out-of-range index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Grid row
    Row,
    /// Grid column
    Column,
    /// Horizontal pixel coordinate in the sheet
    X,
    /// Vertical pixel coordinate in the sheet
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors reported by [`SpriteSheet`](crate::sheet::SpriteSheet) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// Tile size, padding or margin leave no room for a single tile
    #[error("invalid grid configuration: {0}")]
    Configuration(String),

    /// The sheet image could not be opened or decoded
    #[error("cannot load spritesheet '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An index component lies outside the grid (or a pixel outside the sheet)
    #[error("{axis} index {index} out of range (0..{len})")]
    OutOfRange { axis: Axis, index: usize, len: usize },

    /// A named group was requested that was never registered
    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    /// The export directory could not be created
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tile could not be written; `written` files were saved before the failure
    #[error("failed to write '{}' after exporting {written} file(s): {source}", path.display())]
    Export {
        written: usize,
        path: PathBuf,
        #[source]
        source: OutputError,
    },
}

impl SheetError {
    pub(crate) fn out_of_range(axis: Axis, index: usize, len: usize) -> Self {
        SheetError::OutOfRange { axis, index, len }
    }
}
