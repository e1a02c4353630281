use image::{DynamicImage, GrayImage, Luma, RgbImage};

// Rec.601 luma in 14-bit fixed point: 0.299, 0.587, 0.114
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Immutable raster views shared read-only by every extractor
#[derive(Debug, Clone)]
pub struct DecodedImage {
    rgb: RgbImage,
    gray: GrayImage,
}

impl DecodedImage {
    pub fn new(rgb: RgbImage) -> Self {
        let gray = luma_601(&rgb);
        Self { rgb, gray }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgb8())
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }

    pub fn pixel_count(&self) -> usize {
        let (width, height) = self.dimensions();
        width as usize * height as usize
    }
}

fn luma_601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
        Luma([((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA, Rgb};

    #[test]
    fn grayscale_view_matches_dimensions() {
        let rgb = ImageBuffer::from_pixel(8, 4, Rgb([10u8, 20, 30]));
        let decoded = DecodedImage::new(rgb);
        assert_eq!(decoded.gray().dimensions(), (8, 4));
        assert_eq!(decoded.pixel_count(), 32);
    }

    #[test]
    fn grayscale_uses_rec601_weights() {
        let rgb = ImageBuffer::from_fn(3, 1, |x, _| match x {
            0 => Rgb([0u8, 255, 0]),
            1 => Rgb([255, 0, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let decoded = DecodedImage::new(rgb);
        let gray = decoded.gray();
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
        assert_eq!(gray.get_pixel(1, 0)[0], 76);
        assert_eq!(gray.get_pixel(2, 0)[0], 29);
    }

    #[test]
    fn neutral_gray_is_preserved() {
        for v in [0u8, 1, 90, 128, 230, 255] {
            let decoded = DecodedImage::new(ImageBuffer::from_pixel(1, 1, Rgb([v, v, v])));
            assert_eq!(decoded.gray().get_pixel(0, 0)[0], v);
        }
    }

    #[test]
    fn non_rgb_sources_are_converted() {
        let luma_alpha = ImageBuffer::from_pixel(2, 2, LumaA([200u8, 128]));
        let decoded = DecodedImage::from_dynamic(DynamicImage::ImageLumaA8(luma_alpha));
        assert_eq!(decoded.rgb().get_pixel(0, 0), &Rgb([200, 200, 200]));
    }
}
