//! Raster statistics shared by the extractors.

use image::GrayImage;

use super::edges::canny_unblurred;

pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Population variance (divides by `n`)
pub fn variance<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let mu = mean(iter.clone());
    let (sum_sq, count) = iter.fold((0.0, 0usize), |(acc, count), v| {
        let d = v - mu;
        (acc + d * d, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        sum_sq / count as f64
    }
}

pub fn std_dev<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    variance(values).sqrt()
}

pub fn gray_values(gray: &GrayImage) -> impl Iterator<Item = f64> + Clone + '_ {
    gray.as_raw().iter().map(|&v| v as f64)
}

/// Percentile of 8-bit intensities with linear interpolation between ranks
pub fn percentile(gray: &GrayImage, p: f64) -> f64 {
    let mut histogram = [0usize; 256];
    for &v in gray.as_raw() {
        histogram[v as usize] += 1;
    }

    let n = gray.as_raw().len();
    if n == 0 {
        return 0.0;
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let low_value = value_at_rank(&histogram, lower);
    let high_value = value_at_rank(&histogram, upper);

    low_value + (high_value - low_value) * (rank - lower as f64)
}

fn value_at_rank(histogram: &[usize; 256], rank: usize) -> f64 {
    let mut seen = 0usize;
    for (value, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen > rank {
            return value as f64;
        }
    }
    255.0
}

/// Fraction of non-zero pixels in a binary map
pub fn foreground_fraction(mask: &GrayImage) -> f64 {
    let total = mask.as_raw().len();
    if total == 0 {
        return 0.0;
    }
    let on = mask.as_raw().iter().filter(|&&v| v > 0).count();
    on as f64 / total as f64
}

/// Fraction of pixels marked by the unblurred Canny pass
pub fn edge_fraction(gray: &GrayImage, low: f32, high: f32) -> f64 {
    foreground_fraction(&canny_unblurred(gray, low, high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    #[test]
    fn percentile_interpolates_like_numpy() {
        // values 0..=9 -> 20th percentile at rank 1.8
        let gray = ImageBuffer::from_fn(10, 1, |x, _| Luma([x as u8]));
        assert!((percentile(&gray, 20.0) - 1.8).abs() < 1e-9);
        assert!((percentile(&gray, 80.0) - 7.2).abs() < 1e-9);
        assert_eq!(percentile(&gray, 100.0), 9.0);
    }

    #[test]
    fn variance_is_population_variance() {
        let v = variance([1.0, 2.0, 3.0, 4.0]);
        assert!((v - 1.25).abs() < 1e-12);
        assert_eq!(variance(std::iter::empty::<f64>()), 0.0);
    }

    #[test]
    fn flat_image_has_no_edges() {
        let gray = ImageBuffer::from_pixel(16, 16, Luma([90u8]));
        assert_eq!(edge_fraction(&gray, 50.0, 150.0), 0.0);
    }

    #[test]
    fn fine_checker_texture_registers_edges() {
        // 2-px cells alternating 90/170
        let gray = ImageBuffer::from_fn(24, 24, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                Luma([90u8])
            } else {
                Luma([170])
            }
        });
        let fraction = edge_fraction(&gray, 50.0, 150.0);
        assert!(fraction > 0.0 && fraction <= 1.0);
    }
}
