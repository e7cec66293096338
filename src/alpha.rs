//! Alpha resolution - decides once per sheet what counts as background

use image::{DynamicImage, Rgb, Rgba, RgbaImage};

use crate::error::{Axis, SheetError};

/// How the background of a sheet is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaSpec {
    /// Sample the key color from this pixel of the sheet
    Pixel { x: u32, y: u32 },
    /// Use this color as the key
    Color(Rgb<u8>),
}

/// Working pixels of a sheet together with its canonical background.
#[derive(Debug, Clone)]
pub struct ResolvedAlpha {
    /// RGBA buffer tiles are cut from
    pub pixels: RgbaImage,
    /// Key color, or `None` for native per-pixel alpha
    pub background: Option<Rgb<u8>>,
}

/// Resolve `alpha` against a decoded sheet.
///
/// With `None` the sheet keeps its own alpha channel. Otherwise the sheet is
/// flattened to RGB first (any source alpha is dropped) and the key is either
/// the given color or the flattened pixel at the sample point. Pixels equal to
/// the key get alpha 0, all others alpha 255.
///
/// # Errors
///
/// Returns [`SheetError::OutOfRange`] when a sample coordinate lies outside
/// the sheet.
pub fn resolve_alpha(
    source: &DynamicImage,
    alpha: Option<AlphaSpec>,
) -> Result<ResolvedAlpha, SheetError> {
    let Some(spec) = alpha else {
        return Ok(ResolvedAlpha {
            pixels: source.to_rgba8(),
            background: None,
        });
    };

    let flat = source.to_rgb8();
    let key = match spec {
        AlphaSpec::Color(color) => color,
        AlphaSpec::Pixel { x, y } => {
            if x >= flat.width() {
                return Err(SheetError::out_of_range(Axis::X, x as usize, flat.width() as usize));
            }
            if y >= flat.height() {
                return Err(SheetError::out_of_range(Axis::Y, y as usize, flat.height() as usize));
            }
            *flat.get_pixel(x, y)
        }
    };

    let pixels = RgbaImage::from_fn(flat.width(), flat.height(), |x, y| {
        let Rgb([r, g, b]) = *flat.get_pixel(x, y);
        let a = if Rgb([r, g, b]) == key { 0 } else { 255 };
        Rgba([r, g, b, a])
    });

    Ok(ResolvedAlpha {
        pixels,
        background: Some(key),
    })
}
