//! QR rendering for check-in tokens.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

use crate::Result;

/// Pixels per QR module.
pub const MODULE_SIZE: u32 = 10;

/// Renders `token` as a black-on-white PNG.
///
/// Error correction is level L, the smallest version that fits is chosen, and
/// the image carries the standard 4-module quiet zone. The output depends only
/// on `token`.
pub fn render(token: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(token.as_bytes(), EcLevel::L)?;
    let image = code
        .render::<Luma<u8>>()
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .quiet_zone(true)
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_render_is_deterministic_png() {
        let first = render("abc123").unwrap();
        let second = render("abc123").unwrap();
        assert!(!first.is_empty());
        assert!(first.starts_with(PNG_MAGIC));
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_tokens_differ() {
        assert_ne!(render("abc123").unwrap(), render("abc124").unwrap());
    }

    #[test]
    fn test_dimensions_follow_module_size_and_margin() {
        let bytes = render("abc123").unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();

        // version 1 is 21 modules wide, plus a 4-module quiet zone on each side
        let expected = (21 + 2 * 4) * MODULE_SIZE;
        assert_eq!(decoded.width(), expected);
        assert_eq!(decoded.height(), expected);
    }

    #[test]
    fn test_uuid_token_renders() {
        let token = uuid::Uuid::new_v4().to_string();
        assert!(render(&token).unwrap().starts_with(PNG_MAGIC));
    }
}
