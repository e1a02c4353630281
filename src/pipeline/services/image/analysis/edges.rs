//! Canny edge map computed on the raw grayscale raster.
//!
//! No smoothing pass runs before the gradient, so the hysteresis thresholds
//! apply to the 3x3 Sobel response of the image as decoded. The gradient
//! magnitude is the L1 norm `|gx| + |gy|`.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

const SUPPRESSED: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Binary edge map (255 = edge) from Sobel gradients, non-maximum suppression and hysteresis
pub fn canny_unblurred(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);

    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let (gx, gy) = (gx.as_raw(), gy.as_raw());

    let magnitude: Vec<f32> = gx
        .iter()
        .zip(gy)
        .map(|(&x, &y)| (x as f32).abs() + (y as f32).abs())
        .collect();
    // outside the raster the magnitude reads as zero
    let at = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0.0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    let mut class = vec![SUPPRESSED; w * h];
    let mut pending = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = magnitude[idx];
            if m <= low {
                continue;
            }

            let (ax, ay) = ((gx[idx] as f32).abs(), (gy[idx] as f32).abs());
            let (xi, yi) = (x as i64, y as i64);
            let is_max = if ay <= ax * TAN_22_5 {
                m > at(xi - 1, yi) && m >= at(xi + 1, yi)
            } else if ay >= ax * TAN_67_5 {
                m > at(xi, yi - 1) && m >= at(xi, yi + 1)
            } else if (gx[idx] as i32) * (gy[idx] as i32) > 0 {
                m > at(xi - 1, yi - 1) && m > at(xi + 1, yi + 1)
            } else {
                m > at(xi + 1, yi - 1) && m > at(xi - 1, yi + 1)
            };

            if !is_max {
                continue;
            }
            if m > high {
                class[idx] = STRONG;
                pending.push(idx);
            } else {
                class[idx] = WEAK;
            }
        }
    }

    // weak maxima survive only when 8-connected to a strong one
    while let Some(idx) = pending.pop() {
        let (x, y) = (idx % w, idx / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let n = ny * w + nx;
                if class[n] == WEAK {
                    class[n] = STRONG;
                    pending.push(n);
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        if class[y as usize * w + x as usize] == STRONG {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}
