//! Transparency classification for tiles

use image::{GenericImageView, Rgb, Rgba};

/// Whether every pixel of `tile` is background.
///
/// With a `background` key, a pixel is background when its RGB channels equal
/// the key exactly (alpha is ignored). Without a key, a pixel is background
/// when its alpha is 0; images decoded without an alpha channel come through as
/// fully opaque and are therefore never transparent in this mode.
///
/// The scan stops at the first non-background pixel.
pub fn is_transparent<I>(tile: &I, background: Option<Rgb<u8>>) -> bool
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    match background {
        Some(key) => tile.pixels().all(|(_, _, p)| matches_key(p, key)),
        None => tile.pixels().all(|(_, _, p)| p[3] == 0),
    }
}

fn matches_key(pixel: Rgba<u8>, key: Rgb<u8>) -> bool {
    pixel[0] == key[0] && pixel[1] == key[1] && pixel[2] == key[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

    #[test]
    fn test_native_alpha_fully_transparent() {
        let tile = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        assert!(is_transparent(&tile, None));
    }

    #[test]
    fn test_native_alpha_single_visible_pixel() {
        let mut tile = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        tile.put_pixel(3, 3, Rgba([0, 0, 0, 1]));
        assert!(!is_transparent(&tile, None));
    }

    #[test]
    fn test_native_alpha_opaque_tile() {
        let tile = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert!(!is_transparent(&tile, None));
    }

    #[test]
    fn test_keyed_ignores_alpha() {
        // Key match decides, whatever the alpha channel says
        let mut tile = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 255, 255]));
        tile.put_pixel(1, 1, Rgba([255, 0, 255, 0]));
        assert!(is_transparent(&tile, Some(MAGENTA)));
    }

    #[test]
    fn test_keyed_single_differing_pixel() {
        let mut tile = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 255, 255]));
        tile.put_pixel(0, 2, Rgba([255, 0, 254, 255]));
        assert!(!is_transparent(&tile, Some(MAGENTA)));
    }

    #[test]
    fn test_keyed_transparent_black_is_not_background() {
        let tile = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        assert!(!is_transparent(&tile, Some(MAGENTA)));
    }

    #[test]
    fn test_sub_image_view() {
        let mut sheet = RgbaImage::from_pixel(8, 4, Rgba([0, 0, 0, 0]));
        sheet.put_pixel(6, 1, Rgba([255, 255, 255, 255]));

        let left = sheet.view(0, 0, 4, 4);
        let right = sheet.view(4, 0, 4, 4);
        assert!(is_transparent(&*left, None));
        assert!(!is_transparent(&*right, None));
    }
}
