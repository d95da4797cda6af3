//! Code 128 barcode rendering
//!
//! Encodes a payload with `barcoders` and rasterizes it to a PNG buffer.
//! Pixel dimensions are read back from the decoded image header rather
//! than assumed from the encoding length.

use barcoders::generators::image::{Color, Image as ImageGenerator, Rotation};
use barcoders::sym::code128::Code128;
use image::DynamicImage;
use tracing::instrument;

use crate::error::{PrintError, PrintResult};

/// Code 128 character set B prefix required by the encoder
/// (covers the full printable ASCII range used by product codes)
const CHARSET_B: char = '\u{0181}';

/// A rendered barcode raster plus its measured pixel size
#[derive(Debug, Clone)]
pub struct BarcodeImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

/// Render a Code 128 barcode
///
/// `bar_height` is the bar height in device dots, `module_width` the dot
/// width of one narrow module. Encoding failures (payload outside the
/// symbology's character set, encoder fault) are reported per item; the
/// caller decides whether to continue without a barcode.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn render_code128(
    payload: &str,
    bar_height: u32,
    module_width: u32,
) -> PrintResult<BarcodeImage> {
    let data = if payload.starts_with(CHARSET_B) {
        payload.to_string()
    } else {
        format!("{CHARSET_B}{payload}")
    };

    let encoded = Code128::new(&data)
        .map_err(|e| PrintError::Barcode(format!("{payload:?}: {e}")))?
        .encode();

    let generator = ImageGenerator::PNG {
        height: bar_height.max(1),
        xdim: module_width.max(1),
        rotation: Rotation::Zero,
        foreground: Color::new([0, 0, 0, 255]),
        background: Color::new([255, 255, 255, 255]),
    };
    let png = generator
        .generate(&encoded[..])
        .map_err(|e| PrintError::Barcode(format!("rasterization failed: {e}")))?;

    let image = image::load_from_memory(&png)
        .map_err(|e| PrintError::Barcode(format!("rendered image unreadable: {e}")))?;
    let width = image.width();
    let height = image.height();

    Ok(BarcodeImage {
        image,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numeric_payload() {
        let barcode = render_code128("1234567890", 80, 2).unwrap();
        assert!(barcode.width > 0);
        assert_eq!(barcode.height, 80);
    }

    #[test]
    fn test_dimensions_match_image() {
        let barcode = render_code128("SKU-42", 60, 1).unwrap();
        assert_eq!(barcode.width, barcode.image.width());
        assert_eq!(barcode.height, barcode.image.height());
    }

    #[test]
    fn test_wider_module_scales_width() {
        let narrow = render_code128("ABC123", 50, 1).unwrap();
        let wide = render_code128("ABC123", 50, 2).unwrap();
        assert_eq!(wide.width, narrow.width * 2);
    }

    #[test]
    fn test_unencodable_payload_errors() {
        let result = render_code128("café au lait", 50, 1);
        assert!(matches!(result, Err(PrintError::Barcode(_))));
    }
}
