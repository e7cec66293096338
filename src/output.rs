//! PNG output and export file naming

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image as PNG.
///
/// The format is fixed to PNG regardless of the path's extension.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Make sure `dir` exists.
///
/// # Returns
///
/// * `Ok(true)` if the directory had to be created
/// * `Ok(false)` if it already existed
pub fn ensure_dir(dir: &Path) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    Ok(true)
}

/// Path of an exported tile.
///
/// # Output Naming Rules
///
/// | Export | Output |
/// |--------|--------|
/// | Single tile | `dir/{name}.png` |
/// | Tile at `(row, col)` of a multi-tile export | `dir/{name}_{row}_{col}.png` |
pub fn tile_path(dir: &Path, name: &str, position: Option<(usize, usize)>) -> PathBuf {
    match position {
        Some((row, column)) => dir.join(format!("{}_{}_{}.png", name, row, column)),
        None => dir.join(format!("{}.png", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_tile_path_single() {
        let path = tile_path(Path::new("png"), "hero", None);
        assert_eq!(path, PathBuf::from("png/hero.png"));
    }

    #[test]
    fn test_tile_path_positioned() {
        let path = tile_path(Path::new("out/tiles"), "sprite", Some((2, 11)));
        assert_eq!(path, PathBuf::from("out/tiles/sprite_2_11.png"));
    }

    #[test]
    fn test_ensure_dir_reports_creation() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/png");

        assert!(ensure_dir(&target).unwrap());
        assert!(target.is_dir());
        assert!(!ensure_dir(&target).unwrap());
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_save_png_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.png");

        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 1));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*loaded.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_png_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent/tile.png");

        let result = save_png(&RgbaImage::new(1, 1), &path);
        assert!(matches!(result, Err(OutputError::Image(_)) | Err(OutputError::Io(_))));
    }
}
