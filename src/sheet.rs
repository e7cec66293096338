//! Spritesheet - a decoded sheet, its tile grid and its named groups
//!
//! The grid is built once when the sheet is constructed and never changes.
//! Fetching returns [`Tile`] views that borrow the sheet's pixels, so the sheet
//! must outlive every tile handed out.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, Rgb, Rgba, RgbaImage, SubImage};

use crate::alpha::{resolve_alpha, AlphaSpec};
use crate::error::SheetError;
use crate::geometry::{GridLayout, TileRect};
use crate::grid::Grid;
use crate::index::{select, CellRef, GridIndex, Selection, SpriteIndex};
use crate::output::{ensure_dir, save_png, tile_path};
use crate::report::{ConsoleReporter, SheetEvent, SheetReporter};

/// Default file name stem for exports
pub const DEFAULT_EXPORT_NAME: &str = "sprite";

/// Default export directory
pub const DEFAULT_EXPORT_DIR: &str = "png";

/// Label used as the source of sheets built from in-memory images
const MEMORY_SOURCE: &str = "<memory>";

/// Construction parameters for a [`SpriteSheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Tile dimensions `(width, height)` in pixels
    pub tile_size: (u32, u32),
    /// Gap on each side of every tile
    pub padding: u32,
    /// Border around the whole grid
    pub margin: u32,
    /// Background key; `None` uses the sheet's own alpha channel
    pub alpha: Option<AlphaSpec>,
    /// Report progress through the sheet's reporter
    pub verbose: bool,
}

impl SheetOptions {
    pub fn new(tile_size: (u32, u32)) -> Self {
        Self {
            tile_size,
            padding: 0,
            margin: 0,
            alpha: None,
            verbose: false,
        }
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_alpha(mut self, alpha: AlphaSpec) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// A view of one grid cell, borrowing the sheet's pixels.
#[derive(Clone, Copy)]
pub struct Tile<'a> {
    pixels: &'a RgbaImage,
    row: usize,
    column: usize,
    rect: TileRect,
}

impl<'a> Tile<'a> {
    /// Grid row of this tile.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Grid column of this tile.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Pixel rectangle of this tile within the sheet.
    pub fn rect(&self) -> TileRect {
        self.rect
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// Zero-copy view of the tile's pixels.
    pub fn view(&self) -> SubImage<&'a RgbaImage> {
        self.pixels.view(self.rect.x, self.rect.y, self.rect.width, self.rect.height)
    }

    /// Pixel at `(x, y)` relative to the tile, or `None` outside it.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.rect.width || y >= self.rect.height {
            return None;
        }
        Some(*self.pixels.get_pixel(self.rect.x + x, self.rect.y + y))
    }

    /// Copy the tile's pixels into an owned image.
    pub fn to_image(&self) -> RgbaImage {
        self.view().to_image()
    }
}

impl fmt::Debug for Tile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("row", &self.row)
            .field("column", &self.column)
            .field("rect", &self.rect)
            .finish()
    }
}

impl PartialEq for Tile<'_> {
    /// Tiles are equal when they are the same cell of the same sheet.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.pixels, other.pixels)
            && self.row == other.row
            && self.column == other.column
            && self.rect == other.rect
    }
}

/// Result of [`SpriteSheet::fetch`], shaped like the request.
///
/// Absent tiles (background cells) appear as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteFetch<'a> {
    /// A single cell (`Cell` requests)
    Tile(Option<Tile<'a>>),
    /// A sequence of cells (rows, row slices and column slices)
    Row(Vec<Option<Tile<'a>>>),
    /// A sub-grid (regions)
    Grid(Vec<Vec<Option<Tile<'a>>>>),
}

impl<'a> SpriteFetch<'a> {
    /// The tile of a single-cell result.
    pub fn tile(&self) -> Option<Tile<'a>> {
        match self {
            SpriteFetch::Tile(tile) => *tile,
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&[Option<Tile<'a>>]> {
        match self {
            SpriteFetch::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&[Vec<Option<Tile<'a>>>]> {
        match self {
            SpriteFetch::Grid(rows) => Some(rows),
            _ => None,
        }
    }

    /// Number of cells in the result, absent ones included.
    pub fn cell_count(&self) -> usize {
        match self {
            SpriteFetch::Tile(_) => 1,
            SpriteFetch::Row(row) => row.len(),
            SpriteFetch::Grid(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// Present tiles in row-major order.
    pub fn tiles(&self) -> Vec<Tile<'a>> {
        match self {
            SpriteFetch::Tile(tile) => tile.iter().copied().collect(),
            SpriteFetch::Row(row) => row.iter().flatten().copied().collect(),
            SpriteFetch::Grid(rows) => rows.iter().flatten().flatten().copied().collect(),
        }
    }
}

/// Something [`SpriteSheet::export`] can write out.
#[derive(Debug, Clone)]
pub enum Exportable<'a> {
    /// A tile that was already fetched
    Tile(Tile<'a>),
    /// A request to resolve first
    Index(SpriteIndex),
}

impl<'a> From<Tile<'a>> for Exportable<'a> {
    fn from(tile: Tile<'a>) -> Self {
        Exportable::Tile(tile)
    }
}

impl From<SpriteIndex> for Exportable<'_> {
    fn from(index: SpriteIndex) -> Self {
        Exportable::Index(index)
    }
}

impl From<GridIndex> for Exportable<'_> {
    fn from(index: GridIndex) -> Self {
        Exportable::Index(index.into())
    }
}

/// A spritesheet sliced into a grid of tiles.
pub struct SpriteSheet {
    source: String,
    path: Option<PathBuf>,
    options: SheetOptions,
    pixels: RgbaImage,
    background: Option<Rgb<u8>>,
    grid: Grid,
    groups: HashMap<String, Selection>,
    verbose: bool,
    reporter: Box<dyn SheetReporter>,
}

impl fmt::Debug for SpriteSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteSheet")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("background", &self.background)
            .field("rows", &self.row_count())
            .field("columns", &self.column_count())
            .field("sprite_count", &self.sprite_count())
            .field("groups", &self.group_names())
            .finish()
    }
}

impl SpriteSheet {
    /// Load a sheet from disk and slice it.
    ///
    /// Verbose output goes to stderr.
    ///
    /// # Errors
    ///
    /// * [`SheetError::Load`] if the file is missing or cannot be decoded
    /// * [`SheetError::OutOfRange`] if the alpha sample point is outside the sheet
    /// * [`SheetError::Configuration`] if no tile fits
    pub fn open(path: impl AsRef<Path>, options: SheetOptions) -> Result<Self, SheetError> {
        Self::open_with_reporter(path, options, Box::new(ConsoleReporter::new()))
    }

    /// Like [`open`](Self::open), reporting through `reporter`.
    pub fn open_with_reporter(
        path: impl AsRef<Path>,
        options: SheetOptions,
        reporter: Box<dyn SheetReporter>,
    ) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| SheetError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::build(image, path.display().to_string(), Some(path.to_path_buf()), options, reporter)
    }

    /// Slice an already decoded image.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{DynamicImage, Rgba, RgbaImage};
    /// use sheetcut::index::GridIndex;
    /// use sheetcut::sheet::{SheetOptions, SpriteSheet};
    ///
    /// let mut img = RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 0]));
    /// img.put_pixel(20, 3, Rgba([255, 255, 255, 255]));
    ///
    /// let sheet = SpriteSheet::from_image(
    ///     DynamicImage::ImageRgba8(img),
    ///     SheetOptions::new((16, 16)),
    /// ).unwrap();
    ///
    /// assert_eq!((sheet.row_count(), sheet.column_count()), (1, 2));
    /// assert_eq!(sheet.sprite_count(), 1);
    /// assert!(sheet.fetch(GridIndex::cell(0, 0)).unwrap().tile().is_none());
    /// ```
    pub fn from_image(image: DynamicImage, options: SheetOptions) -> Result<Self, SheetError> {
        Self::from_image_with_reporter(image, options, Box::new(ConsoleReporter::new()))
    }

    /// Like [`from_image`](Self::from_image), reporting through `reporter`.
    pub fn from_image_with_reporter(
        image: DynamicImage,
        options: SheetOptions,
        reporter: Box<dyn SheetReporter>,
    ) -> Result<Self, SheetError> {
        Self::build(image, MEMORY_SOURCE.to_string(), None, options, reporter)
    }

    fn build(
        image: DynamicImage,
        source: String,
        path: Option<PathBuf>,
        options: SheetOptions,
        reporter: Box<dyn SheetReporter>,
    ) -> Result<Self, SheetError> {
        let verbose = options.verbose;
        let emit = |event: SheetEvent| {
            if verbose {
                reporter.report(event);
            }
        };

        emit(SheetEvent::Loaded {
            source: source.clone(),
            width: image.width(),
            height: image.height(),
        });

        let resolved = resolve_alpha(&image, options.alpha)?;
        emit(SheetEvent::AlphaResolved {
            background: resolved.background,
        });

        let layout = GridLayout::compute(
            resolved.pixels.dimensions(),
            options.tile_size,
            options.padding,
            options.margin,
        )?;
        let grid = Grid::extract(&resolved.pixels, layout, resolved.background);
        emit(SheetEvent::Extracted {
            sprites: grid.sprite_count(),
            transparent: grid.transparent_count(),
            rows: grid.row_count(),
            columns: grid.column_count(),
        });

        Ok(Self {
            source,
            path,
            options,
            pixels: resolved.pixels,
            background: resolved.background,
            grid,
            groups: HashMap::new(),
            verbose,
            reporter,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of non-background tiles.
    pub fn sprite_count(&self) -> usize {
        self.grid.sprite_count()
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    /// Canonical background color, or `None` in native-alpha mode.
    pub fn background(&self) -> Option<Rgb<u8>> {
        self.background
    }

    pub fn tile_size(&self) -> (u32, u32) {
        self.options.tile_size
    }

    pub fn padding(&self) -> u32 {
        self.options.padding
    }

    pub fn margin(&self) -> u32 {
        self.options.margin
    }

    /// File the sheet was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sheet dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Registered group names, sorted.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn toggle_verbose(&mut self) {
        self.verbose = !self.verbose;
    }

    // =========================================================================
    // Indexing
    // =========================================================================

    /// Fetch tiles by row, cell, slice, region or group name.
    ///
    /// # Errors
    ///
    /// * [`SheetError::OutOfRange`] when the index falls outside the grid
    /// * [`SheetError::UnknownGroup`] when no group has the given name
    pub fn fetch(&self, index: impl Into<SpriteIndex>) -> Result<SpriteFetch<'_>, SheetError> {
        match index.into() {
            SpriteIndex::Grid(index) => {
                let selection = select(&self.grid, &index)?;
                Ok(self.materialize(&selection))
            }
            SpriteIndex::Group(name) => match self.groups.get(&name) {
                Some(selection) => Ok(self.materialize(selection)),
                None => Err(SheetError::UnknownGroup(name)),
            },
        }
    }

    /// Bind `name` to what `index` selects right now.
    ///
    /// Binding an existing name replaces the previous selection.
    pub fn name(&mut self, index: GridIndex, name: impl Into<String>) -> Result<(), SheetError> {
        let selection = select(&self.grid, &index)?;
        self.groups.insert(name.into(), selection);
        Ok(())
    }

    fn tile_at(&self, cell: &CellRef) -> Option<Tile<'_>> {
        cell.rect.map(|rect| Tile {
            pixels: &self.pixels,
            row: cell.row,
            column: cell.column,
            rect,
        })
    }

    fn materialize(&self, selection: &Selection) -> SpriteFetch<'_> {
        match selection {
            Selection::Cell(cell) => SpriteFetch::Tile(self.tile_at(cell)),
            Selection::Row(cells) => SpriteFetch::Row(cells.iter().map(|c| self.tile_at(c)).collect()),
            Selection::Grid(rows) => SpriteFetch::Grid(
                rows.iter()
                    .map(|cells| cells.iter().map(|c| self.tile_at(c)).collect())
                    .collect(),
            ),
        }
    }

    /// Every present tile, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = Tile<'_>> + '_ {
        self.grid.present().map(move |(row, column, rect)| Tile {
            pixels: &self.pixels,
            row,
            column,
            rect,
        })
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Write tiles as PNG files into `directory`, creating it if needed.
    ///
    /// | `sprite` | Files written |
    /// |----------|---------------|
    /// | `None` | every present tile as `{name}_{row}_{col}.png` |
    /// | a [`Tile`] | `{name}.png` |
    /// | a single-cell index | `{name}.png` (nothing if the cell is absent) |
    /// | any other index | each present tile as `{name}_{row}_{col}.png` |
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Index errors are reported before anything touches the filesystem. A
    /// failed write stops the export; [`SheetError::Export`] records how many
    /// files were written before it.
    pub fn export<'s>(
        &'s self,
        sprite: Option<Exportable<'s>>,
        name: &str,
        directory: impl AsRef<Path>,
    ) -> Result<usize, SheetError> {
        let directory = directory.as_ref();

        let jobs: Vec<(PathBuf, Tile<'s>)> = match sprite {
            None => self
                .tiles()
                .map(|t| (tile_path(directory, name, Some((t.row, t.column))), t))
                .collect(),
            Some(Exportable::Tile(tile)) => vec![(tile_path(directory, name, None), tile)],
            Some(Exportable::Index(index)) => match self.fetch(index)? {
                SpriteFetch::Tile(tile) => tile
                    .into_iter()
                    .map(|t| (tile_path(directory, name, None), t))
                    .collect(),
                many => many
                    .tiles()
                    .into_iter()
                    .map(|t| (tile_path(directory, name, Some((t.row, t.column))), t))
                    .collect(),
            },
        };

        let created = ensure_dir(directory).map_err(|source| SheetError::CreateDir {
            path: directory.to_path_buf(),
            source,
        })?;
        if created {
            self.emit(SheetEvent::DirectoryCreated {
                path: directory.to_path_buf(),
            });
        }

        let mut written = 0;
        for (path, tile) in jobs {
            if let Err(source) = save_png(&tile.to_image(), &path) {
                return Err(SheetError::Export {
                    written,
                    path,
                    source,
                });
            }
            written += 1;
        }

        self.emit(SheetEvent::Exported {
            count: written,
            directory: directory.to_path_buf(),
        });
        Ok(written)
    }

    fn emit(&self, event: SheetEvent) {
        if self.verbose {
            self.reporter.report(event);
        }
    }
}
