//! sheetcut - Library for slicing spritesheets into tile grids
//!
//! This library provides functionality to:
//! - Load a spritesheet and cut it into a grid of equal-sized tiles
//! - Tell sprites apart from empty background, by alpha or by a color key
//! - Fetch tiles by row, cell, row/column slice, region or named group
//! - Export tiles as PNG files

pub mod alpha;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod index;
pub mod output;
pub mod report;
pub mod sheet;
pub mod transparency;

pub use alpha::AlphaSpec;
pub use error::SheetError;
pub use index::{GridIndex, Span, SpriteIndex};
pub use sheet::{Exportable, SheetOptions, SpriteFetch, SpriteSheet, Tile};
