//! QR codes, rasterised to a greyscale bitmap with one pixel per module.

use crate::PDFError;
use image::{DynamicImage, GrayImage, Luma};
use log::trace;
use qrcode::{Color, EcLevel, QrCode};

/// Light modules kept around the symbol so scanners can find its edges
pub const QUIET_ZONE: u32 = 4;

/// Error correction of every code: quartile, recovering about a quarter of the
/// codewords
pub const EC_LEVEL: EcLevel = EcLevel::Q;

/// Encode `payload` as a QR code bitmap, including the quiet zone. The bitmap
/// is square; scale it to the block's size when drawing
pub fn encode(payload: &str) -> Result<DynamicImage, PDFError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EC_LEVEL)?;
    let modules = code.width() as u32;
    let side = modules + 2 * QUIET_ZONE;
    trace!("qr code of {modules} modules for {} bytes", payload.len());

    let mut bitmap = GrayImage::from_pixel(side, side, Luma([255]));
    for (i, colour) in code.to_colors().into_iter().enumerate() {
        if colour == Color::Dark {
            let x = i as u32 % modules + QUIET_ZONE;
            let y = i as u32 / modules + QUIET_ZONE;
            bitmap.put_pixel(x, y, Luma([0]));
        }
    }
    Ok(DynamicImage::ImageLuma8(bitmap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_has_quiet_zone() {
        let bitmap = encode("https://example.com/track/12345").expect("short payloads encode");
        let grey = bitmap.to_luma8();
        assert_eq!(grey.width(), grey.height());
        // version 1 codes are 21 modules wide, anything larger is a multiple of 4 more
        assert_eq!((grey.width() - 2 * QUIET_ZONE - 21) % 4, 0);
        assert_eq!(grey.get_pixel(0, 0), &Luma([255]));
        // the top-left finder pattern starts right after the quiet zone
        assert_eq!(grey.get_pixel(QUIET_ZONE, QUIET_ZONE), &Luma([0]));
    }

    #[test]
    fn codes_use_quartile_error_correction() {
        let payload = "https://example.com/track/12345";
        let bitmap = encode(payload).expect("short payloads encode");
        let expected = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::Q)
            .expect("short payloads encode");
        assert_eq!(expected.error_correction_level(), EcLevel::Q);
        assert_eq!(
            bitmap.to_luma8().width(),
            expected.width() as u32 + 2 * QUIET_ZONE
        );
        let medium = QrCode::new(payload.as_bytes()).expect("short payloads encode");
        assert!(expected.width() > medium.width());
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let payload = "x".repeat(8000);
        assert!(matches!(encode(&payload), Err(PDFError::QrCode(_))));
    }
}
