use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::pipeline::types::{DecodedImage, EncodedImage};

/// Turns a base64 payload into the raster views the extractors consume
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, encoded: &EncodedImage) -> Result<DecodedImage> {
        let bytes = self.decode_base64(encoded.body())?;
        let image = image::load_from_memory(&bytes)?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(AnalysisError::EmptyImage { width, height });
        }

        debug!(
            "Decoded {}x{} image ({:?}) from {} bytes",
            width,
            height,
            image.color(),
            bytes.len()
        );

        Ok(DecodedImage::from_dynamic(image))
    }

    fn decode_base64(&self, body: &str) -> Result<Vec<u8>> {
        // Line-wrapped payloads are common in data URIs
        let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(STANDARD.decode(compact)?)
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> String {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn decodes_data_uri_payload() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(6, 3, Rgb([1, 2, 3])));
        let payload = format!("data:image/png;base64,{}", encode_png(image));

        let decoded = ImageDecoder::new().decode(&EncodedImage::new(payload)).unwrap();
        assert_eq!(decoded.dimensions(), (6, 3));
        assert_eq!(decoded.rgb().get_pixel(5, 2), &Rgb([1, 2, 3]));
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([9, 8, 7, 10])));
        let decoded = ImageDecoder::new()
            .decode(&EncodedImage::new(encode_png(image)))
            .unwrap();
        assert_eq!(decoded.rgb().get_pixel(0, 0), &Rgb([9, 8, 7]));
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([0, 255, 0])));
        let encoded = encode_png(image);
        let (head, tail) = encoded.split_at(encoded.len() / 2);
        let payload = format!("{head}\n{tail}\n");

        assert!(ImageDecoder::new().decode(&EncodedImage::new(payload)).is_ok());
    }

    #[test]
    fn malformed_base64_is_rejected() {
        let err = ImageDecoder::new()
            .decode(&EncodedImage::new("not*valid*base64!!"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBase64(_)));
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let payload = STANDARD.encode(b"definitely not an image");
        let err = ImageDecoder::new()
            .decode(&EncodedImage::new(payload))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ImageDecode(_)));
    }
}
