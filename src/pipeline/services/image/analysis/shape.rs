//! Spot and lesion shape analysis from Otsu-binarized external contours
use std::f64::consts::PI;

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use tracing::debug;

use super::core::FeatureExtractor;
use super::primitives::{mean, variance};
use crate::config::ShapeConfig;
use crate::error::Result;
use crate::pipeline::types::{DecodedImage, ShapeFeatures};

pub struct ShapeContourAnalyzer {
    config: ShapeConfig,
}

/// Area and perimeter of one retained contour
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spot {
    area: f64,
    perimeter: f64,
}

impl Spot {
    fn circularity(&self) -> f64 {
        if self.perimeter > 0.0 {
            4.0 * PI * self.area / (self.perimeter * self.perimeter)
        } else {
            0.0
        }
    }
}

impl ShapeContourAnalyzer {
    pub fn new(config: ShapeConfig) -> Self {
        Self { config }
    }

    /// Otsu foreground inside a 1-px background frame.
    ///
    /// The frame keeps regions touching the image edge from becoming the
    /// outermost border, so every foreground component traces as a top-level
    /// `Outer` contour.
    fn binarize_padded(gray: &GrayImage) -> GrayImage {
        let level = imageproc::contrast::otsu_level(gray);
        let (width, height) = gray.dimensions();
        GrayImage::from_fn(width + 2, height + 2, |x, y| {
            let inside = x >= 1 && y >= 1 && x <= width && y <= height;
            if inside && gray.get_pixel(x - 1, y - 1)[0] > level {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    fn spots(&self, padded: &GrayImage) -> Vec<Spot> {
        let contours: Vec<Contour<i32>> = find_contours(padded);
        contours
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| {
                let points: Vec<Point<i32>> = c
                    .points
                    .into_iter()
                    .map(|p| Point::new(p.x - 1, p.y - 1))
                    .collect();
                Spot {
                    area: polygon_area(&points),
                    perimeter: arc_length(&points, true),
                }
            })
            .filter(|spot| spot.area > self.config.min_spot_area)
            .collect()
    }
}

impl FeatureExtractor for ShapeContourAnalyzer {
    type Output = ShapeFeatures;

    fn extract(&self, image: &DecodedImage) -> Result<ShapeFeatures> {
        let padded = Self::binarize_padded(image.gray());
        let spots = self.spots(&padded);
        debug!("{} contours above area threshold", spots.len());

        let areas: Vec<f64> = spots.iter().map(|s| s.area).collect();
        let avg_spot_size = mean(areas.iter().copied());
        let shape_irregularity = if spots.is_empty() {
            0.0
        } else {
            1.0 - mean(spots.iter().map(Spot::circularity))
        };
        let size_variance = if areas.len() > 1 {
            variance(areas.iter().copied())
        } else {
            0.0
        };

        Ok(ShapeFeatures {
            spot_count: spots.len(),
            avg_spot_size,
            shape_irregularity,
            size_variance,
        })
    }

    fn name(&self) -> &'static str {
        "ShapeContourAnalyzer"
    }
}

/// Shoelace area of a closed polygon
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}
