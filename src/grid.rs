//! Grid extraction - builds the occupancy grid of a sheet once, at construction
//!
//! The grid stores tile rectangles rather than pixel views so that it can live
//! next to the pixel buffer it describes; views are created on demand by the
//! owning [`SpriteSheet`](crate::sheet::SpriteSheet).

use image::{GenericImageView, Rgb, RgbaImage};

use crate::geometry::{GridLayout, TileRect};
use crate::transparency::is_transparent;

/// One grid cell: the tile rectangle, or `None` when the cell is background.
pub type Cell = Option<TileRect>;

/// Row-major grid of cells with identical row lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    layout: GridLayout,
    cells: Vec<Vec<Cell>>,
    sprite_count: usize,
}

impl Grid {
    /// Classify every cell of `layout` against `pixels`.
    ///
    /// `pixels` must be the buffer `layout` was computed for.
    pub fn extract(pixels: &RgbaImage, layout: GridLayout, background: Option<Rgb<u8>>) -> Self {
        let mut sprite_count = 0;
        let cells = (0..layout.rows)
            .map(|row| {
                (0..layout.columns)
                    .map(|column| {
                        let rect = layout.tile_rect(row, column);
                        let view = pixels.view(rect.x, rect.y, rect.width, rect.height);
                        if is_transparent(&*view, background) {
                            None
                        } else {
                            sprite_count += 1;
                            Some(rect)
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            layout,
            cells,
            sprite_count,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of non-background cells.
    pub fn sprite_count(&self) -> usize {
        self.sprite_count
    }

    /// Number of background cells.
    pub fn transparent_count(&self) -> usize {
        self.layout.cell_count() - self.sprite_count
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.layout.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.cells.get(row)?.get(column).copied()
    }

    /// Present tiles in row-major order, with their grid coordinates.
    pub fn present(&self) -> impl Iterator<Item = (usize, usize, TileRect)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(column, cell)| cell.map(|rect| (row, column, rect)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// Sheet of `rows` x `cols` 4x4 tiles, painting the tiles listed in `filled`.
    fn sheet(rows: u32, cols: u32, filled: &[(u32, u32)]) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(cols * 4, rows * 4, CLEAR);
        for &(r, c) in filled {
            img.put_pixel(c * 4 + 1, r * 4 + 2, RED);
        }
        img
    }

    #[test]
    fn test_grid_shape_matches_layout() {
        for (w, h, tile, padding, margin) in
            [(48, 64, 16, 0, 0), (100, 37, 7, 1, 3), (33, 33, 5, 2, 1), (10, 10, 10, 0, 0)]
        {
            let img = RgbaImage::from_pixel(w, h, RED);
            let layout = GridLayout::compute((w, h), (tile, tile), padding, margin).unwrap();
            let grid = Grid::extract(&img, layout, None);

            assert_eq!(grid.row_count(), layout.rows);
            assert!(grid.rows().iter().all(|row| row.len() == layout.columns));
            assert_eq!(grid.sprite_count(), layout.cell_count());
        }
    }

    #[test]
    fn test_sprite_count_matches_present_cells() {
        let img = sheet(3, 4, &[(0, 0), (1, 3), (2, 1), (2, 2)]);
        let layout = GridLayout::compute(img.dimensions(), (4, 4), 0, 0).unwrap();
        let grid = Grid::extract(&img, layout, None);

        let present = grid.rows().iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(grid.sprite_count(), 4);
        assert_eq!(present, 4);
        assert_eq!(grid.transparent_count(), 8);
    }

    #[test]
    fn test_cells_are_row_major() {
        let img = sheet(2, 3, &[(1, 2)]);
        let layout = GridLayout::compute(img.dimensions(), (4, 4), 0, 0).unwrap();
        let grid = Grid::extract(&img, layout, None);

        assert_eq!(grid.cell(0, 2), Some(None));
        assert_eq!(grid.cell(1, 2), Some(Some(layout.tile_rect(1, 2))));
        assert_eq!(grid.cell(2, 0), None);

        let present: Vec<_> = grid.present().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(present, vec![(1, 2)]);
    }

    #[test]
    fn test_keyed_background() {
        let key = Rgb([255, 0, 0]);
        // Fully red sheet with one blue pixel in the second tile
        let mut img = RgbaImage::from_pixel(8, 4, RED);
        img.put_pixel(5, 0, Rgba([0, 0, 255, 255]));
        let layout = GridLayout::compute(img.dimensions(), (4, 4), 0, 0).unwrap();
        let grid = Grid::extract(&img, layout, Some(key));

        assert_eq!(grid.sprite_count(), 1);
        assert_eq!(grid.row(0).unwrap()[0], None);
        assert!(grid.row(0).unwrap()[1].is_some());
    }
}
