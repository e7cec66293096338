//! Tile placement - carves a sheet into a row-major grid of equally sized cells
//!
//! Every cell occupies `tile + 2 * padding` pixels along each axis, and the whole
//! grid is inset by `margin` on all four sides. Trailing cells that do not fully
//! fit inside the sheet are dropped.

use crate::error::SheetError;

/// Pixel rectangle of a single tile within the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Grid dimensions and spacing derived from a sheet size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    pub margin: u32,
}

impl GridLayout {
    /// Compute the grid that fits into `sheet_size`.
    ///
    /// # Arguments
    ///
    /// * `sheet_size` - Sheet dimensions `(width, height)` in pixels
    /// * `tile_size` - Tile dimensions `(width, height)` in pixels
    /// * `padding` - Gap on each side of every tile
    /// * `margin` - Border around the whole grid
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Configuration`] when the tile size is zero or when
    /// not even one row or column fits.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetcut::geometry::GridLayout;
    ///
    /// let layout = GridLayout::compute((64, 48), (16, 16), 0, 0).unwrap();
    /// assert_eq!((layout.rows, layout.columns), (3, 4));
    ///
    /// // 1px padding: each cell spans 18px, so only 3 columns fit in 64px
    /// let layout = GridLayout::compute((64, 48), (16, 16), 1, 0).unwrap();
    /// assert_eq!((layout.rows, layout.columns), (2, 3));
    /// ```
    pub fn compute(
        sheet_size: (u32, u32),
        tile_size: (u32, u32),
        padding: u32,
        margin: u32,
    ) -> Result<Self, SheetError> {
        let (tile_width, tile_height) = tile_size;
        if tile_width == 0 || tile_height == 0 {
            return Err(SheetError::Configuration(format!(
                "tile size must be positive, got {}x{}",
                tile_width, tile_height
            )));
        }

        let columns = cells_along(sheet_size.0, tile_width, padding, margin);
        let rows = cells_along(sheet_size.1, tile_height, padding, margin);

        if rows == 0 || columns == 0 {
            return Err(SheetError::Configuration(format!(
                "{}x{} tiles with padding {} and margin {} do not fit in a {}x{} sheet",
                tile_width, tile_height, padding, margin, sheet_size.0, sheet_size.1
            )));
        }

        Ok(Self {
            rows,
            columns,
            tile_width,
            tile_height,
            padding,
            margin,
        })
    }

    /// Rectangle of the cell at `(row, column)`.
    ///
    /// The caller is responsible for staying inside `rows` x `columns`.
    pub fn tile_rect(&self, row: usize, column: usize) -> TileRect {
        TileRect {
            x: self.offset(column, self.tile_width),
            y: self.offset(row, self.tile_height),
            width: self.tile_width,
            height: self.tile_height,
        }
    }

    /// Total number of cells, present or not.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    fn offset(&self, cell: usize, tile: u32) -> u32 {
        let stride = tile as u64 + 2 * self.padding as u64;
        // Bounded by the sheet dimension for any cell inside the grid
        (self.margin as u64 + cell as u64 * stride + self.padding as u64) as u32
    }
}

/// Number of whole cells along one axis.
fn cells_along(sheet: u32, tile: u32, padding: u32, margin: u32) -> usize {
    let stride = tile as u64 + 2 * padding as u64;
    match (sheet as u64).checked_sub(2 * margin as u64) {
        Some(usable) => (usable / stride) as usize,
        None => 0,
    }
}
