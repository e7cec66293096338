//! Project configuration
//!
//! Provides types and parsing for `sheetcut.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
