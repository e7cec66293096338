//! Color key parsing
//!
//! Accepts the same color notations as CSS so that a key can be written the way
//! artists usually write it:
//! - Hex: `#RGB`, `#RRGGBB` (alpha digits are accepted and ignored)
//! - Functional and named colors: `rgb(255 0 255)`, `hsl(300, 100%, 50%)`, `magenta`

use image::Rgb;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color key parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into the RGB triple used as a transparency key.
///
/// Any alpha component in the input is discarded, since keys compare RGB only.
///
/// # Examples
///
/// ```
/// use sheetcut::color::parse_color_key;
///
/// assert_eq!(parse_color_key("#F0F").unwrap(), image::Rgb([255, 0, 255]));
/// assert_eq!(parse_color_key("#00FF0080").unwrap(), image::Rgb([0, 255, 0]));
/// assert_eq!(parse_color_key("magenta").unwrap(), image::Rgb([255, 0, 255]));
/// ```
pub fn parse_color_key(s: &str) -> Result<Rgb<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_key(hex),
        None => parse_css_key(s),
    }
}

/// Format a key as `#RRGGBB`.
pub fn format_color_key(color: Rgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

fn parse_hex_key(hex: &str) -> Result<Rgb<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // #RGB / #RGBA - each digit is doubled
        3 | 4 => Ok(Rgb([digits[0] * 17, digits[1] * 17, digits[2] * 17])),
        6 | 8 => Ok(Rgb([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit; callers validate the digit first.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn parse_css_key(s: &str) -> Result<Rgb<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgb([rgba.red, rgba.green, rgba.blue])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgb([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_short_and_long() {
        assert_eq!(parse_color_key("#F0F").unwrap(), Rgb([255, 0, 255]));
        assert_eq!(parse_color_key("#ff00ff").unwrap(), Rgb([255, 0, 255]));
        assert_eq!(parse_color_key("#12345678").unwrap(), Rgb([0x12, 0x34, 0x56]));
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(parse_color_key(""), Err(ColorError::Empty));
        assert_eq!(parse_color_key("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color_key("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_css_functional_and_named() {
        assert_eq!(parse_color_key("rgb(255, 0, 255)").unwrap(), Rgb([255, 0, 255]));
        assert_eq!(parse_color_key("black").unwrap(), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_css_garbage_rejected() {
        assert!(matches!(parse_color_key("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_format_color_key() {
        assert_eq!(format_color_key(Rgb([255, 0, 128])), "#FF0080");
    }
}
