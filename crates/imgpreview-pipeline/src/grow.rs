//! Region growing: partition a bitmap into provisionally-labeled
//! same-colored regions.
//!
//! A single row-major scan assigns every pixel a provisional region id
//! by comparing it against its upward and leftward neighbors under a
//! color-distance threshold. Growing row-by-row can reach the same
//! region from two directions under different ids; those conflicts are
//! recorded as ordered [`MergeInstruction`]s and resolved afterwards by
//! [`crate::merge`].

use image::RgbImage;

use crate::color::{self, Pixel};

/// A 2D grid of region ids, one per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    width: u32,
    height: u32,
    labels: Vec<u32>,
}

impl LabelGrid {
    /// Create a grid of the given dimensions with all labels zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            labels: vec![0; width as usize * height as usize],
        }
    }

    /// Grid width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Label at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds (indexing slip in the
    /// pipeline, not an input condition).
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.labels[y as usize * self.width as usize + x as usize]
    }

    /// Set the label at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, label: u32) {
        debug_assert!(x < self.width && y < self.height);
        self.labels[y as usize * self.width as usize + x as usize] = label;
    }

    /// Iterate over all labels in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.labels.iter().copied()
    }

    /// Mutable access to the raw label buffer, row-major.
    pub fn labels_mut(&mut self) -> &mut [u32] {
        &mut self.labels
    }
}

/// An id-merge recorded when a pixel matched both its upward and
/// leftward neighbors but those neighbors held different ids.
///
/// The `weak` id is to be folded into the `dominant` id. Vertical
/// continuity takes precedence over horizontal, so the upward label is
/// always the dominant one. The order instructions are recorded in is
/// significant and preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInstruction {
    /// The id that survives the merge.
    pub dominant: u32,
    /// The id to be replaced.
    pub weak: u32,
}

/// Output of one region-growing pass.
#[derive(Debug, Clone)]
pub struct Growth {
    /// Provisional per-pixel region ids.
    pub labels: LabelGrid,
    /// Representative color per provisional id, indexed by id.
    ///
    /// The representative is the id's first-seen pixel, not a running
    /// average.
    pub colors: Vec<Pixel>,
    /// Id-merge conflicts, in discovery order.
    pub merges: Vec<MergeInstruction>,
}

/// Grow same-colored regions over the image in one row-major scan.
///
/// For each pixel: adopt the upward label if the pixel is within
/// `threshold` of both the pixel above and that label's representative
/// color; otherwise adopt the leftward label under the same test;
/// otherwise allocate a fresh label whose representative color is this
/// pixel. When both directions match but disagree on the id, a
/// [`MergeInstruction`] is recorded with the upward id dominant.
///
/// Pixel `(0, 0)` always allocates a new label. No wraparound.
#[must_use]
pub fn grow(image: &RgbImage, threshold: f64) -> Growth {
    let (width, height) = image.dimensions();
    let mut labels = LabelGrid::new(width, height);
    let mut colors: Vec<Pixel> = Vec::new();
    let mut merges: Vec<MergeInstruction> = Vec::new();

    let pixel = |x: u32, y: u32| color::pack(*image.get_pixel(x, y));

    for y in 0..height {
        for x in 0..width {
            let c = pixel(x, y);

            let matches_up = y > 0 && {
                let up_label = labels.get(x, y - 1);
                color::distance(c, pixel(x, y - 1)) < threshold
                    && color::distance(c, colors[up_label as usize]) < threshold
            };
            let matches_left = x > 0 && {
                let left_label = labels.get(x - 1, y);
                color::distance(c, pixel(x - 1, y)) < threshold
                    && color::distance(c, colors[left_label as usize]) < threshold
            };

            if matches_up {
                let up_label = labels.get(x, y - 1);
                labels.set(x, y, up_label);
                if matches_left {
                    let left_label = labels.get(x - 1, y);
                    if left_label != up_label {
                        merges.push(MergeInstruction {
                            dominant: up_label,
                            weak: left_label,
                        });
                    }
                }
            } else if matches_left {
                labels.set(x, y, labels.get(x - 1, y));
            } else {
                let fresh = u32::try_from(colors.len()).unwrap_or(u32::MAX);
                labels.set(x, y, fresh);
                colors.push(c);
            }
        }
    }

    Growth {
        labels,
        colors,
        merges,
    }
}
