//! QR artwork rendering with the `qrcode` and `image` crates.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use qrcode::render::svg;

use crate::domain::ports::{ArtworkFormat, TagArtwork, TagArtworkError, TagArtworkRenderer};

/// Renders QR symbols as square PNG or SVG images.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrArtworkRenderer;

impl QrArtworkRenderer {
    fn encode(payload: &str) -> Result<QrCode, TagArtworkError> {
        QrCode::new(payload.as_bytes()).map_err(|err| TagArtworkError::encoding(err.to_string()))
    }

    fn png(code: &QrCode, size: u32) -> Result<Vec<u8>, TagArtworkError> {
        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(size, size)
            .max_dimensions(size, size)
            .build();
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| TagArtworkError::output(err.to_string()))?;
        Ok(bytes)
    }

    fn svg(code: &QrCode, size: u32) -> Vec<u8> {
        code.render::<svg::Color<'_>>()
            .quiet_zone(true)
            .min_dimensions(size, size)
            .max_dimensions(size, size)
            .build()
            .into_bytes()
    }
}

impl TagArtworkRenderer for QrArtworkRenderer {
    fn render(
        &self,
        payload: &str,
        format: ArtworkFormat,
        size: u32,
    ) -> Result<TagArtwork, TagArtworkError> {
        let code = Self::encode(payload)?;
        let bytes = match format {
            ArtworkFormat::Png => Self::png(&code, size)?,
            ArtworkFormat::Svg => Self::svg(&code, size),
        };
        Ok(TagArtwork { format, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PAYLOAD: &str = "https://tagpet.example/qr/QR1741944600000ABCDEFGHI";
    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[rstest]
    fn png_output_is_a_png() {
        let artwork = QrArtworkRenderer
            .render(PAYLOAD, ArtworkFormat::Png, 300)
            .expect("render");
        assert!(artwork.bytes.starts_with(PNG_SIGNATURE));
        let decoded = image::load_from_memory(&artwork.bytes).expect("decodes");
        assert!(decoded.width() <= 300);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[rstest]
    fn svg_output_is_markup() {
        let artwork = QrArtworkRenderer
            .render(PAYLOAD, ArtworkFormat::Svg, 500)
            .expect("render");
        let markup = String::from_utf8(artwork.bytes).expect("utf8");
        assert!(markup.contains("<svg"));
        assert_eq!(artwork.format, ArtworkFormat::Svg);
    }

    #[rstest]
    fn oversized_payloads_fail_to_encode() {
        let payload = "x".repeat(8000);
        let err = QrArtworkRenderer
            .render(&payload, ArtworkFormat::Png, 1000)
            .expect_err("too long");
        assert!(matches!(err, TagArtworkError::Encoding { .. }));
    }
}
