//! QR code producer

use crate::error::{Error, Result};
use crate::qr::RenderParameters;
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use qrcode::QrCode;
use qrcode::render::unicode;

/// QR code producer
///
/// Turns text into a raster image according to [`RenderParameters`]. Output
/// is deterministic for identical inputs, and producing an image never
/// touches the filesystem.
pub struct QrProducer {
    /// Error correction level
    ecc_level: qrcode::EcLevel,
}

impl QrProducer {
    /// Create a new producer with default settings (Low ECC)
    pub fn new() -> Self {
        Self {
            ecc_level: qrcode::EcLevel::L,
        }
    }

    /// Create a new producer with a specific error correction level
    pub fn with_ecc_level(ecc_level: qrcode::EcLevel) -> Self {
        Self { ecc_level }
    }

    /// Produce a QR code image for `text`
    ///
    /// Fails with [`Error::Validation`] when `text` is empty after trimming;
    /// the untrimmed text is what gets encoded.
    pub fn produce(&self, text: &str, params: &RenderParameters) -> Result<DynamicImage> {
        let code = self.encode(text)?;

        let module = params.scale.module_size();
        // The renderer's quiet zone is fixed at 4 modules, so render bare
        // and composite the requested border onto a padded canvas instead.
        let inner = code
            .render::<Rgba<u8>>()
            .quiet_zone(false)
            .module_dimensions(module, module)
            .dark_color(params.fill.to_rgba())
            .light_color(params.back.to_rgba())
            .build();

        let pad = params.border() * module;
        let mut canvas = RgbaImage::from_pixel(
            inner.width() + 2 * pad,
            inner.height() + 2 * pad,
            params.back.to_rgba(),
        );
        imageops::replace(&mut canvas, &inner, i64::from(pad), i64::from(pad));

        Ok(DynamicImage::ImageRgba8(canvas))
    }

    /// Produce a Unicode half-block rendering of `text` for terminal preview
    pub fn produce_preview(&self, text: &str) -> Result<String> {
        let code = self.encode(text)?;

        Ok(code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Dark)
            .light_color(unicode::Dense1x2::Light)
            .build())
    }

    fn encode(&self, text: &str) -> Result<QrCode> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Please enter text or URL".to_string()));
        }

        QrCode::with_error_correction_level(text.as_bytes(), self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))
    }
}

impl Default for QrProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{BoxScale, Color};

    #[test]
    fn test_produce_rejects_empty_input() {
        let producer = QrProducer::new();
        let params = RenderParameters::default();

        assert!(matches!(
            producer.produce("", &params),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            producer.produce("   ", &params),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_produce_geometry() {
        let producer = QrProducer::new();
        let params = RenderParameters::new(BoxScale::Small, Color::BLACK, Color::WHITE, 2);

        let image = producer.produce("https://example.com", &params).unwrap();

        let module = params.scale.module_size();
        let width = image.width();
        // Width is (modules + 2 * border) * module_size, so module-aligned
        // and at least a version-1 symbol (21 modules) plus the border.
        assert_eq!(width % module, 0);
        assert!(width >= (21 + 2 * params.border()) * module);
        assert_eq!(width, image.height());
    }

    #[test]
    fn test_produce_is_deterministic() {
        let producer = QrProducer::new();
        let params = RenderParameters::default();

        let first = producer.produce("determinism check", &params).unwrap();
        let second = producer.produce("determinism check", &params).unwrap();

        assert_eq!(first.to_rgba8().into_raw(), second.to_rgba8().into_raw());
    }

    #[test]
    fn test_produce_uses_requested_colors() {
        let producer = QrProducer::new();
        let fill = Color::rgb(200, 0, 0);
        let back = Color::rgb(0, 0, 200);
        let params = RenderParameters::new(BoxScale::Small, fill, back, 4);

        let image = producer.produce("colored", &params).unwrap().to_rgba8();

        // Corner pixel lies inside the border.
        assert_eq!(*image.get_pixel(0, 0), back.to_rgba());
        let pixels: Vec<_> = image.pixels().collect();
        assert!(pixels.contains(&&fill.to_rgba()));
    }

    #[test]
    fn test_with_ecc_level_changes_symbol_size() {
        let text = "https://example.com/some/longer/path";
        let params = RenderParameters::default();

        let low = QrProducer::new().produce(text, &params).unwrap();
        let high = QrProducer::with_ecc_level(qrcode::EcLevel::H)
            .produce(text, &params)
            .unwrap();

        // Stronger error correction needs a higher symbol version for the
        // same text, so the rendered image grows.
        assert!(high.width() > low.width());
    }

    #[test]
    fn test_round_trip() {
        let producer = QrProducer::new();
        let params = RenderParameters::default();

        let original = "Test payload for round trip";
        let image = producer.produce(original, &params).unwrap();

        let gray = image.to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);

        let (_meta, content) = grids[0].decode().unwrap();
        assert_eq!(content, original);
    }

    #[test]
    fn test_produce_preview() {
        let producer = QrProducer::new();

        let preview = producer.produce_preview("preview me").unwrap();
        assert!(!preview.is_empty());

        assert!(matches!(
            producer.produce_preview("  "),
            Err(Error::Validation(_))
        ));
    }
}
