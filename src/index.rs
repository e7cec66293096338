//! Sprite indexing - the six request shapes and how they select grid cells
//!
//! | Request | Selects |
//! |---------|---------|
//! | `Row(r)` | the whole row `r` |
//! | `Cell(r, c)` | the single cell at `(r, c)` |
//! | `RowSlice(r, cols)` | part of row `r` |
//! | `ColumnSlice(rows, c)` | column `c` of each selected row |
//! | `Region(rows, cols)` | a sub-grid |
//! | `Group(name)` | a previously named selection |
//!
//! Indices are written as strings on the command line and in config files:
//! `1`, `1,2`, `1,0:2`, `0:2,1`, `0:2,0:2`, `corner`.

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};
use std::str::FromStr;

use thiserror::Error;

use crate::error::{Axis, SheetError};
use crate::geometry::TileRect;
use crate::grid::Grid;

/// Half-open range along one grid axis; an open end means "to the last cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: Option<usize>,
}

impl Span {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Resolve against an axis of length `len`.
    ///
    /// Empty and reversed spans resolve to an empty range. A non-empty span
    /// reaching past the axis is an error.
    pub fn resolve(&self, axis: Axis, len: usize) -> Result<Range<usize>, SheetError> {
        let end = self.end.unwrap_or(len);
        if self.start >= end {
            return Ok(0..0);
        }
        if end > len {
            return Err(SheetError::out_of_range(axis, end - 1, len));
        }
        Ok(self.start..end)
    }

    /// Resolve against an axis of length `len`, cutting the span off at the end
    /// of the axis instead of failing.
    pub fn clamp(&self, len: usize) -> Range<usize> {
        let end = self.end.map_or(len, |end| end.min(len));
        if self.start >= end {
            0..0
        } else {
            self.start..end
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Span::new(r.start, Some(r.end))
    }
}

impl From<RangeInclusive<usize>> for Span {
    fn from(r: RangeInclusive<usize>) -> Self {
        Span::new(*r.start(), Some(*r.end() + 1))
    }
}

impl From<RangeFrom<usize>> for Span {
    fn from(r: RangeFrom<usize>) -> Self {
        Span::new(r.start, None)
    }
}

impl From<RangeTo<usize>> for Span {
    fn from(r: RangeTo<usize>) -> Self {
        Span::new(0, Some(r.end))
    }
}

impl From<RangeFull> for Span {
    fn from(_: RangeFull) -> Self {
        Span::new(0, None)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:", self.start),
        }
    }
}

/// Index into the grid itself (every shape except named groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridIndex {
    Row(usize),
    Cell(usize, usize),
    RowSlice(usize, Span),
    ColumnSlice(Span, usize),
    Region(Span, Span),
}

impl GridIndex {
    pub fn row(row: usize) -> Self {
        GridIndex::Row(row)
    }

    pub fn cell(row: usize, column: usize) -> Self {
        GridIndex::Cell(row, column)
    }

    pub fn row_slice(row: usize, columns: impl Into<Span>) -> Self {
        GridIndex::RowSlice(row, columns.into())
    }

    pub fn column_slice(rows: impl Into<Span>, column: usize) -> Self {
        GridIndex::ColumnSlice(rows.into(), column)
    }

    pub fn region(rows: impl Into<Span>, columns: impl Into<Span>) -> Self {
        GridIndex::Region(rows.into(), columns.into())
    }
}

impl From<usize> for GridIndex {
    fn from(row: usize) -> Self {
        GridIndex::Row(row)
    }
}

impl From<(usize, usize)> for GridIndex {
    fn from((row, column): (usize, usize)) -> Self {
        GridIndex::Cell(row, column)
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridIndex::Row(r) => write!(f, "{}", r),
            GridIndex::Cell(r, c) => write!(f, "{},{}", r, c),
            GridIndex::RowSlice(r, cols) => write!(f, "{},{}", r, cols),
            GridIndex::ColumnSlice(rows, c) => write!(f, "{},{}", rows, c),
            GridIndex::Region(rows, cols) => write!(f, "{},{}", rows, cols),
        }
    }
}

/// Any request accepted by [`SpriteSheet::fetch`](crate::sheet::SpriteSheet::fetch).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpriteIndex {
    Grid(GridIndex),
    Group(String),
}

impl SpriteIndex {
    pub fn group(name: impl Into<String>) -> Self {
        SpriteIndex::Group(name.into())
    }
}

impl From<GridIndex> for SpriteIndex {
    fn from(index: GridIndex) -> Self {
        SpriteIndex::Grid(index)
    }
}

impl From<usize> for SpriteIndex {
    fn from(row: usize) -> Self {
        SpriteIndex::Grid(GridIndex::Row(row))
    }
}

impl From<(usize, usize)> for SpriteIndex {
    fn from(cell: (usize, usize)) -> Self {
        SpriteIndex::Grid(cell.into())
    }
}

impl From<&str> for SpriteIndex {
    fn from(name: &str) -> Self {
        SpriteIndex::Group(name.to_string())
    }
}

impl From<String> for SpriteIndex {
    fn from(name: String) -> Self {
        SpriteIndex::Group(name)
    }
}

impl fmt::Display for SpriteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteIndex::Grid(index) => index.fmt(f),
            SpriteIndex::Group(name) => f.write_str(name),
        }
    }
}

/// Error type for index strings that look numeric but are malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexParseError {
    #[error("empty index")]
    Empty,
    #[error("invalid index component '{0}'")]
    InvalidComponent(String),
    #[error("expected 1 or 2 comma-separated components, got {0}")]
    TooManyComponents(usize),
    #[error("a single component cannot be a range: '{0}'")]
    BareRange(String),
}

/// Whether `s` is read as a grid index rather than a group name.
pub(crate) fn is_numeric_syntax(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || c == ',' || c == ':' || c.is_whitespace())
}

/// One comma-separated component: a number or a span.
enum Component {
    Number(usize),
    Span(Span),
}

fn parse_number(s: &str) -> Result<usize, IndexParseError> {
    s.parse().map_err(|_| IndexParseError::InvalidComponent(s.to_string()))
}

fn parse_component(s: &str) -> Result<Component, IndexParseError> {
    let s = s.trim();
    let Some((start, end)) = s.split_once(':') else {
        return parse_number(s).map(Component::Number);
    };
    let (start, end) = (start.trim(), end.trim());
    let start = if start.is_empty() { 0 } else { parse_number(start)? };
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_number(end)?)
    };
    Ok(Component::Span(Span::new(start, end)))
}

impl FromStr for GridIndex {
    type Err = IndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IndexParseError::Empty);
        }

        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [single] => match parse_component(single)? {
                Component::Number(r) => Ok(GridIndex::Row(r)),
                Component::Span(_) => Err(IndexParseError::BareRange(s.to_string())),
            },
            [rows, cols] => match (parse_component(rows)?, parse_component(cols)?) {
                (Component::Number(r), Component::Number(c)) => Ok(GridIndex::Cell(r, c)),
                (Component::Number(r), Component::Span(c)) => Ok(GridIndex::RowSlice(r, c)),
                (Component::Span(r), Component::Number(c)) => Ok(GridIndex::ColumnSlice(r, c)),
                (Component::Span(r), Component::Span(c)) => Ok(GridIndex::Region(r, c)),
            },
            _ => Err(IndexParseError::TooManyComponents(parts.len())),
        }
    }
}

impl FromStr for SpriteIndex {
    type Err = IndexParseError;

    /// Numeric syntax is parsed as a grid index; anything else names a group.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IndexParseError::Empty);
        }
        if is_numeric_syntax(trimmed) {
            trimmed.parse().map(SpriteIndex::Grid)
        } else {
            Ok(SpriteIndex::Group(trimmed.to_string()))
        }
    }
}

/// A grid cell as seen through a selection: its coordinates plus its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
    pub rect: Option<TileRect>,
}

/// Cells picked out by a [`GridIndex`], shaped like the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Cell(CellRef),
    Row(Vec<CellRef>),
    Grid(Vec<Vec<CellRef>>),
}

fn check(axis: Axis, index: usize, len: usize) -> Result<usize, SheetError> {
    if index < len {
        Ok(index)
    } else {
        Err(SheetError::out_of_range(axis, index, len))
    }
}

fn cell_ref(grid: &Grid, row: usize, column: usize) -> CellRef {
    CellRef {
        row,
        column,
        rect: grid.rows()[row][column],
    }
}

fn row_refs(grid: &Grid, row: usize, columns: Range<usize>) -> Vec<CellRef> {
    columns.map(|column| cell_ref(grid, row, column)).collect()
}

/// Resolve `index` to the cells it selects.
///
/// # Errors
///
/// Returns [`SheetError::OutOfRange`] naming the offending axis when a row or
/// column falls outside the grid, or when a non-empty region span does. Row
/// and column slices cut their span off at the edge of the grid.
pub fn select(grid: &Grid, index: &GridIndex) -> Result<Selection, SheetError> {
    let rows = grid.row_count();
    let columns = grid.column_count();

    match *index {
        GridIndex::Row(r) => {
            let r = check(Axis::Row, r, rows)?;
            Ok(Selection::Row(row_refs(grid, r, 0..columns)))
        }
        GridIndex::Cell(r, c) => {
            let r = check(Axis::Row, r, rows)?;
            let c = check(Axis::Column, c, columns)?;
            Ok(Selection::Cell(cell_ref(grid, r, c)))
        }
        GridIndex::RowSlice(r, cols) => {
            let r = check(Axis::Row, r, rows)?;
            Ok(Selection::Row(row_refs(grid, r, cols.clamp(columns))))
        }
        GridIndex::ColumnSlice(row_span, c) => {
            let c = check(Axis::Column, c, columns)?;
            Ok(Selection::Row(row_span.clamp(rows).map(|r| cell_ref(grid, r, c)).collect()))
        }
        GridIndex::Region(row_span, col_span) => {
            let row_span = row_span.resolve(Axis::Row, rows)?;
            let col_span = col_span.resolve(Axis::Column, columns)?;
            Ok(Selection::Grid(
                row_span.map(|r| row_refs(grid, r, col_span.clone())).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridLayout;
    use image::{Rgba, RgbaImage};

    /// 4 rows x 3 columns of 2x2 tiles, every tile opaque.
    fn grid_4x3() -> Grid {
        let img = RgbaImage::from_pixel(6, 8, Rgba([9, 9, 9, 255]));
        let layout = GridLayout::compute((6, 8), (2, 2), 0, 0).unwrap();
        Grid::extract(&img, layout, None)
    }

    fn coords(cells: &[CellRef]) -> Vec<(usize, usize)> {
        cells.iter().map(|c| (c.row, c.column)).collect()
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!("1".parse::<GridIndex>().unwrap(), GridIndex::row(1));
        assert_eq!("1,2".parse::<GridIndex>().unwrap(), GridIndex::cell(1, 2));
        assert_eq!(" 1 , 0:2 ".parse::<GridIndex>().unwrap(), GridIndex::row_slice(1, 0..2));
        assert_eq!("0:2,1".parse::<GridIndex>().unwrap(), GridIndex::column_slice(0..2, 1));
        assert_eq!("0:2,1:".parse::<GridIndex>().unwrap(), GridIndex::region(0..2, 1..));
        assert_eq!(":,:3".parse::<GridIndex>().unwrap(), GridIndex::region(.., ..3));
    }

    #[test]
    fn test_parse_groups_and_errors() {
        assert_eq!(
            "corner".parse::<SpriteIndex>().unwrap(),
            SpriteIndex::group("corner")
        );
        assert_eq!(
            "2,1".parse::<SpriteIndex>().unwrap(),
            SpriteIndex::Grid(GridIndex::cell(2, 1))
        );
        assert_eq!("".parse::<SpriteIndex>(), Err(IndexParseError::Empty));
        assert_eq!(
            "1,2,3".parse::<GridIndex>(),
            Err(IndexParseError::TooManyComponents(3))
        );
        assert!(matches!("0:2".parse::<GridIndex>(), Err(IndexParseError::BareRange(_))));
        assert!(matches!("1,".parse::<GridIndex>(), Err(IndexParseError::InvalidComponent(_))));
    }

    #[test]
    fn test_display_parses_back() {
        for index in [
            GridIndex::row(3),
            GridIndex::cell(0, 1),
            GridIndex::row_slice(2, 1..),
            GridIndex::region(0..2, 0..2),
        ] {
            assert_eq!(index.to_string().parse::<GridIndex>().unwrap(), index);
        }
    }

    #[test]
    fn test_select_shapes() {
        let grid = grid_4x3();

        match select(&grid, &GridIndex::row(1)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(1, 0), (1, 1), (1, 2)]),
            other => panic!("expected row, got {:?}", other),
        }

        match select(&grid, &GridIndex::cell(1, 2)).unwrap() {
            Selection::Cell(cell) => {
                assert_eq!((cell.row, cell.column), (1, 2));
                assert_eq!(cell.rect, grid.cell(1, 2).unwrap());
            }
            other => panic!("expected cell, got {:?}", other),
        }

        match select(&grid, &GridIndex::row_slice(1, 0..2)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(1, 0), (1, 1)]),
            other => panic!("expected row, got {:?}", other),
        }

        match select(&grid, &GridIndex::column_slice(0..2, 1)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(0, 1), (1, 1)]),
            other => panic!("expected row, got {:?}", other),
        }

        match select(&grid, &GridIndex::region(0..2, 0..2)).unwrap() {
            Selection::Grid(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(coords(&rows[0]), vec![(0, 0), (0, 1)]);
                assert_eq!(coords(&rows[1]), vec![(1, 0), (1, 1)]);
            }
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn test_select_bounds() {
        let grid = grid_4x3();

        let err = select(&grid, &GridIndex::row(10)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Row, index: 10, len: 4 }));

        let err = select(&grid, &GridIndex::cell(0, 10)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Column, index: 10, len: 3 }));

        let err = select(&grid, &GridIndex::row_slice(4, 0..1)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Row, .. }));

        let err = select(&grid, &GridIndex::column_slice(0..2, 3)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Column, .. }));

        let err = select(&grid, &GridIndex::region(0..2, 1..4)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Column, .. }));

        let err = select(&grid, &GridIndex::region(2..5, 0..1)).unwrap_err();
        assert!(matches!(err, SheetError::OutOfRange { axis: Axis::Row, index: 4, len: 4 }));
    }

    #[test]
    fn test_slices_stop_at_grid_edge() {
        let grid = grid_4x3();

        match select(&grid, &GridIndex::row_slice(1, 1..10)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(1, 1), (1, 2)]),
            other => panic!("expected row, got {:?}", other),
        }
        match select(&grid, &GridIndex::column_slice(2..5, 0)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(2, 0), (3, 0)]),
            other => panic!("expected row, got {:?}", other),
        }
        assert_eq!(
            select(&grid, &GridIndex::row_slice(0, 5..9)).unwrap(),
            Selection::Row(vec![])
        );
    }

    #[test]
    fn test_empty_and_reversed_spans() {
        let grid = grid_4x3();

        assert_eq!(
            select(&grid, &GridIndex::row_slice(0, Span::new(2, Some(1)))).unwrap(),
            Selection::Row(vec![])
        );
        assert_eq!(
            select(&grid, &GridIndex::row_slice(0, 1..1)).unwrap(),
            Selection::Row(vec![])
        );
        // Empty spans never trip the bounds check
        assert_eq!(
            select(&grid, &GridIndex::region(9..9, 0..1)).unwrap(),
            Selection::Grid(vec![])
        );
        // ... but the fixed column of a column slice is still validated
        assert!(select(&grid, &GridIndex::column_slice(1..1, 7)).is_err());
    }

    #[test]
    fn test_open_spans_reach_the_end() {
        let grid = grid_4x3();
        match select(&grid, &GridIndex::column_slice(2.., 0)).unwrap() {
            Selection::Row(cells) => assert_eq!(coords(&cells), vec![(2, 0), (3, 0)]),
            other => panic!("expected row, got {:?}", other),
        }
    }
}
