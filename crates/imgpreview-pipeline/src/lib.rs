//! imgpreview-pipeline: Pure raster-to-preview conversion core (sans-IO).
//!
//! Two paths share this crate:
//!
//! - **Bitmap**: aspect-preserving resize ([`scale`]) for PNG/JPEG
//!   previews.
//! - **Vector**: flat-colored shape approximation for SVG previews.
//!   The slow tier runs the full segmentation pipeline: region growing
//!   ([`grow`]) -> merge resolution ([`merge`]) -> contour extraction
//!   ([`contour`]) -> draw ordering ([`order`]). Fast and normal tiers
//!   emit per-pixel and run-length rectangles instead.
//!
//! This crate has **no I/O dependencies** -- it operates on decoded
//! in-memory images and returns structured data. Filesystem and codec
//! interaction lives in `imgpreview-batch`.

pub mod color;
pub mod contour;
pub mod grow;
pub mod merge;
pub mod order;
pub mod scale;
pub mod types;

pub use contour::{Bounds, Geometry, Region};
pub use types::{Dimensions, PipelineError, Point, RgbImage, Speed, VectorizeConfig};

/// A draw-ordered shape with its 12-bit fill color.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineShape {
    /// Rectangle or staircase polygon.
    pub geometry: Geometry,
    /// Reduced representative color (4 bits per channel).
    pub fill: u16,
}

/// Result of vectorizing one image: ordered shapes plus the viewport.
///
/// Shape order is draw order -- earlier shapes render beneath later
/// ones, and every region precedes its overlay children.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorOutline {
    /// Source image dimensions, used as the output viewport.
    pub dimensions: Dimensions,
    /// Shapes in draw order.
    pub shapes: Vec<OutlineShape>,
}

/// Vectorize a decoded image into flat-colored shapes.
///
/// Tier selection:
///
/// 1. Fast: one 1x1 rectangle per pixel.
/// 2. Normal: per-row run-length rectangles; runs extend while the next
///    pixel stays within the threshold of the run's first pixel, and
///    the run color is the weighted average of its members.
/// 3. Slow: region growing, merge resolution, contour extraction, and
///    parents-before-children draw ordering.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyImage`] for a zero-sized image,
/// [`PipelineError::InvalidConfig`] for a bad threshold, and
/// [`PipelineError::Invariant`] if the segmentation produced an
/// inconsistent mask (a defect, surfaced loudly).
pub fn vectorize(
    image: &RgbImage,
    config: &VectorizeConfig,
) -> Result<VectorOutline, PipelineError> {
    config.validate()?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PipelineError::EmptyImage);
    }
    let dimensions = Dimensions { width, height };

    let shapes = match config.speed {
        Speed::Fast => vectorize_fast(image),
        Speed::Normal => vectorize_normal(image, config.threshold),
        Speed::Slow => vectorize_slow(image, config.threshold)?,
    };

    Ok(VectorOutline { dimensions, shapes })
}

/// One rectangle per pixel, reduced color.
fn vectorize_fast(image: &RgbImage) -> Vec<OutlineShape> {
    let mut shapes = Vec::with_capacity(image.width() as usize * image.height() as usize);
    for (x, y, rgb) in image.enumerate_pixels() {
        shapes.push(OutlineShape {
            geometry: Geometry::Rect {
                x: f64::from(x),
                y: f64::from(y),
                width: 1.0,
                height: 1.0,
            },
            fill: color::reduce(color::pack(*rgb)),
        });
    }
    shapes
}

/// Per-row run-length rectangles with weighted-average run colors.
fn vectorize_normal(image: &RgbImage, threshold: f64) -> Vec<OutlineShape> {
    let (width, height) = image.dimensions();
    let mut shapes = Vec::new();
    for y in 0..height {
        let mut x = 0;
        while x < width {
            let first = color::pack(*image.get_pixel(x, y));
            let mut average = first;
            let mut run = 1;
            while x + run < width {
                let next = color::pack(*image.get_pixel(x + run, y));
                if color::distance(first, next) >= threshold {
                    break;
                }
                average = color::weighted_average(average, run, next);
                run += 1;
            }
            shapes.push(OutlineShape {
                geometry: Geometry::Rect {
                    x: f64::from(x),
                    y: f64::from(y),
                    width: f64::from(run),
                    height: 1.0,
                },
                fill: color::reduce(average),
            });
            x += run;
        }
    }
    shapes
}

/// Full segmentation pipeline, shapes in draw order.
fn vectorize_slow(image: &RgbImage, threshold: f64) -> Result<Vec<OutlineShape>, PipelineError> {
    // 1. Grow provisional regions row by row.
    let growth = grow::grow(image, threshold);

    // 2. Collapse merge chains to canonical ids.
    let resolved = merge::resolve(growth);

    // 3. Extract per-region spans, bounds, children, and geometry.
    let regions = contour::extract(&resolved)?;

    // 4. Parents draw before their overlay children.
    let ordered = order::draw_order(regions);

    Ok(ordered
        .into_iter()
        .map(|r| OutlineShape {
            geometry: r.geometry,
            fill: r.fill,
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbImage::new(0, 0);
        let result = vectorize(&img, &VectorizeConfig::default());
        assert!(matches!(result, Err(PipelineError::EmptyImage)));
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let img = RgbImage::from_pixel(2, 2, WHITE);
        let config = VectorizeConfig {
            threshold: -1.0,
            ..VectorizeConfig::default()
        };
        assert!(matches!(
            vectorize(&img, &config),
            Err(PipelineError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn fast_tier_emits_one_rect_per_pixel() {
        let img = RgbImage::from_pixel(4, 3, WHITE);
        let config = VectorizeConfig {
            speed: Speed::Fast,
            ..VectorizeConfig::default()
        };
        let outline = vectorize(&img, &config).unwrap();
        assert_eq!(outline.shapes.len(), 12);
        assert!(outline.shapes.iter().all(|s| s.fill == 0xFFF));
        assert_eq!(
            outline.shapes[0].geometry,
            Geometry::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0
            },
        );
    }

    #[test]
    fn normal_tier_run_length_encodes_rows() {
        // Each row is two flat runs: 3 black then 5 white.
        let img = RgbImage::from_fn(8, 2, |x, _| if x < 3 { BLACK } else { WHITE });
        let config = VectorizeConfig {
            speed: Speed::Normal,
            ..VectorizeConfig::default()
        };
        let outline = vectorize(&img, &config).unwrap();
        assert_eq!(outline.shapes.len(), 4);
        assert_eq!(
            outline.shapes[0].geometry,
            Geometry::Rect {
                x: 0.0,
                y: 0.0,
                width: 3.0,
                height: 1.0
            },
        );
        assert_eq!(
            outline.shapes[1].geometry,
            Geometry::Rect {
                x: 3.0,
                y: 0.0,
                width: 5.0,
                height: 1.0
            },
        );
        assert_eq!(outline.shapes[0].fill, 0x000);
        assert_eq!(outline.shapes[1].fill, 0xFFF);
    }

    #[test]
    fn normal_tier_averages_run_color() {
        // Within-threshold drift: the run color is the member average,
        // not the first pixel.
        let img = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([100; 3]) } else { Rgb([115; 3]) });
        let config = VectorizeConfig {
            speed: Speed::Normal,
            ..VectorizeConfig::default()
        };
        let outline = vectorize(&img, &config).unwrap();
        assert_eq!(outline.shapes.len(), 1);
        // (100 + 115) / 2 = 107 = 0x6b, reduced to nibble 0x6.
        assert_eq!(outline.shapes[0].fill, 0x666);
    }

    #[test]
    fn slow_tier_single_color_is_one_full_rect() {
        let img = RgbImage::from_pixel(6, 4, WHITE);
        let config = VectorizeConfig {
            speed: Speed::Slow,
            ..VectorizeConfig::default()
        };
        let outline = vectorize(&img, &config).unwrap();
        assert_eq!(outline.shapes.len(), 1);
        assert_eq!(
            outline.shapes[0].geometry,
            Geometry::Rect {
                x: 0.0,
                y: 0.0,
                width: 6.0,
                height: 4.0
            },
        );
        assert_eq!(outline.shapes[0].fill, 0xFFF);
    }

    #[test]
    fn slow_tier_draws_parent_before_inner_child() {
        // Black dot inside a white field: the white shape must come
        // first so the dot renders on top.
        let img = RgbImage::from_fn(5, 5, |x, y| if x == 2 && y == 2 { BLACK } else { WHITE });
        let config = VectorizeConfig {
            speed: Speed::Slow,
            ..VectorizeConfig::default()
        };
        let outline = vectorize(&img, &config).unwrap();
        assert_eq!(outline.shapes.len(), 2);
        assert_eq!(outline.shapes[0].fill, 0xFFF);
        assert_eq!(outline.shapes[1].fill, 0x000);
    }

    #[test]
    fn dimensions_match_source() {
        let img = RgbImage::from_pixel(9, 7, WHITE);
        let outline = vectorize(&img, &VectorizeConfig::default()).unwrap();
        assert_eq!(
            outline.dimensions,
            Dimensions {
                width: 9,
                height: 7
            },
        );
    }
}
