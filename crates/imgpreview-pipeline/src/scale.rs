//! Plain bitmap scaling: aspect-preserving fit and per-tier resampling.
//!
//! The target width/height describe a bounding box; the output keeps
//! the source aspect ratio and fits inside it. Tier selection maps to
//! `image` crate resampling filters, with the slow tier scaling
//! progressively (halving until near the target) for better quality on
//! large reductions.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::types::{Dimensions, Speed};

/// Fit `source` into the `target` box, preserving aspect ratio.
///
/// Uses the smaller of the two axis ratios and truncates, so the result
/// never exceeds the box on either axis. Degenerate results are clamped
/// to at least 1×1.
#[must_use]
pub fn fit_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    let width_ratio = f64::from(target.width) / f64::from(source.width);
    let height_ratio = f64::from(target.height) / f64::from(source.height);
    let ratio = width_ratio.min(height_ratio);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = |v: u32| ((f64::from(v) * ratio) as u32).max(1);
    Dimensions {
        width: scaled(source.width),
        height: scaled(source.height),
    }
}

/// Resize to exactly `target`, with quality selected by tier.
///
/// Fast uses nearest-neighbor, normal bilinear. Slow halves the image
/// with bilinear filtering until the next halving would undershoot the
/// target, then performs a final bilinear resize to the exact size.
#[must_use]
pub fn resize(image: &RgbImage, target: Dimensions, speed: Speed) -> RgbImage {
    match speed {
        Speed::Fast => imageops::resize(image, target.width, target.height, FilterType::Nearest),
        Speed::Normal => imageops::resize(image, target.width, target.height, FilterType::Triangle),
        Speed::Slow => {
            let mut current = image.clone();
            let mut width = image.width() / 2;
            let mut height = image.height() / 2;
            while width > target.width && height > target.height {
                current = imageops::resize(&current, width, height, FilterType::Triangle);
                width /= 2;
                height /= 2;
            }
            imageops::resize(&current, target.width, target.height, FilterType::Triangle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn fit_landscape_into_square() {
        // 200x100 into 50x50: width ratio 0.25 wins.
        assert_eq!(fit_dimensions(dims(200, 100), dims(50, 50)), dims(50, 25));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(fit_dimensions(dims(100, 200), dims(50, 50)), dims(25, 50));
    }

    #[test]
    fn fit_never_exceeds_box() {
        let fitted = fit_dimensions(dims(333, 217), dims(64, 48));
        assert!(fitted.width <= 64);
        assert!(fitted.height <= 48);
    }

    #[test]
    fn fit_clamps_to_one_pixel() {
        let fitted = fit_dimensions(dims(10_000, 10), dims(100, 100));
        assert!(fitted.height >= 1);
    }

    #[test]
    fn resize_produces_exact_dimensions() {
        let img = RgbImage::from_pixel(64, 32, Rgb([10, 20, 30]));
        for speed in [Speed::Fast, Speed::Normal, Speed::Slow] {
            let out = resize(&img, dims(16, 8), speed);
            assert_eq!(out.dimensions(), (16, 8), "tier {speed}");
        }
    }

    #[test]
    fn slow_resize_of_uniform_image_stays_uniform() {
        let img = RgbImage::from_pixel(100, 100, Rgb([77, 77, 77]));
        let out = resize(&img, dims(9, 9), Speed::Slow);
        for p in out.pixels() {
            assert_eq!(p.0, [77, 77, 77]);
        }
    }

    #[test]
    fn upscale_is_allowed() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let out = resize(&img, dims(8, 8), Speed::Normal);
        assert_eq!(out.dimensions(), (8, 8));
    }
}
