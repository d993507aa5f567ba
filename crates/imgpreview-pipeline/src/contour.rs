//! Contour extraction: turn the resolved multi-label mask into one
//! shape per region.
//!
//! Each region is scanned row-by-row for its horizontal spans, global
//! bounding box, and overlay children (other ids found strictly inside
//! a row span, whose pixels sit within this region's footprint and
//! must be drawn on top of it). Solid regions become rectangles; the
//! general case becomes a closed staircase polygon built from the
//! per-row spans.

use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::color::{self, Pixel};
use crate::merge::Resolved;
use crate::types::{PipelineError, Point};

/// Inclusive bounding box `[x1, y1] - [x2, y2]` in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Leftmost column containing the region.
    pub x1: u32,
    /// Topmost row containing the region.
    pub y1: u32,
    /// Rightmost column containing the region.
    pub x2: u32,
    /// Bottommost row containing the region.
    pub y2: u32,
}

/// A contiguous run of columns in one row belonging to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    row: u32,
    start: u32,
    end: u32,
}

/// Geometric form of an extracted region.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle (degenerate or solid region).
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
    /// Closed staircase outline from the per-row spans.
    Polygon {
        /// Outline vertices: left edge traced upward, right edge
        /// traced downward.
        points: Vec<Point>,
    },
}

/// A final region: one id, its representative color, extent, geometry,
/// and the set of ids that must render on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Canonical region id (sparse id space).
    pub id: u32,
    /// Representative color, reduced to 12 bits for fill styles.
    pub fill: u16,
    /// Inclusive bounding box.
    pub bounds: Bounds,
    /// Ids whose pixels fall within this region's row spans without
    /// belonging to it. Drawn after (on top of) this region.
    pub children: BTreeSet<u32>,
    /// Emitted shape.
    pub geometry: Geometry,
}

/// Extract one [`Region`] per surviving id, in scan-discovery order.
///
/// # Errors
///
/// Returns [`PipelineError::Invariant`] if a claimed id has no pixels
/// in the mask.
pub fn extract(resolved: &Resolved) -> Result<Vec<Region>, PipelineError> {
    resolved
        .ids
        .iter()
        .map(|&id| extract_region(resolved, id))
        .collect()
}

/// Single-pass span scan for one region id.
fn extract_region(resolved: &Resolved, id: u32) -> Result<Region, PipelineError> {
    let mask = &resolved.mask;
    let mut spans: Vec<Span> = Vec::new();
    let mut children = BTreeSet::new();

    for y in 0..mask.height() {
        let mut start = None;
        let mut end = 0;
        for x in 0..mask.width() {
            if mask.get(x, y) == id {
                if start.is_none() {
                    start = Some(x);
                }
                end = x;
            }
        }
        if let Some(start) = start {
            for x in start..=end {
                let other = mask.get(x, y);
                if other != id {
                    children.insert(other);
                }
            }
            spans.push(Span { row: y, start, end });
        }
    }

    let (Some(first), Some(last)) = (spans.first(), spans.last()) else {
        return Err(PipelineError::Invariant(format!(
            "region {id} has no spans in the mask"
        )));
    };
    let bounds = Bounds {
        x1: spans.iter().map(|s| s.start).min().unwrap_or(first.start),
        y1: first.row,
        x2: spans.iter().map(|s| s.end).max().unwrap_or(last.end),
        y2: last.row,
    };

    let geometry = build_geometry(&spans, bounds, children.is_empty());
    let fill = color::reduce(representative(resolved, id));

    Ok(Region {
        id,
        fill,
        bounds,
        children,
        geometry,
    })
}

/// Representative color of a canonical id.
fn representative(resolved: &Resolved, id: u32) -> Pixel {
    resolved.colors[id as usize]
}

/// Decide rectangle vs polygon and build the shape.
///
/// The rectangle case covers a single row or column (where the
/// staircase outline would be degenerate) and a region that exactly
/// fills its bounding box. Everything else becomes the staircase
/// polygon. Non-monotonic spans can self-intersect; known limitation
/// of the outline construction, not special-cased.
fn build_geometry(spans: &[Span], bounds: Bounds, no_children: bool) -> Geometry {
    let width = bounds.x2 - bounds.x1;
    let height = bounds.y2 - bounds.y1;

    let solid = no_children
        && spans.len() as u64 == u64::from(height) + 1
        && spans
            .iter()
            .all(|s| s.start == bounds.x1 && s.end == bounds.x2);

    if width == 0 || height == 0 || solid {
        return Geometry::Rect {
            x: f64::from(bounds.x1),
            y: f64::from(bounds.y1),
            width: f64::from(width) + 1.0,
            height: f64::from(height) + 1.0,
        };
    }

    // Per row: (start, row) to the front, (end+1, row) to the back,
    // then (start, row+1) front and (end+1, row+1) back. Front-to-back
    // iteration then walks the left edge upward and the right edge
    // downward, closing the loop.
    let mut points: VecDeque<Point> = VecDeque::with_capacity(spans.len() * 4);
    for span in spans {
        let start = f64::from(span.start);
        let end = f64::from(span.end) + 1.0;
        let top = f64::from(span.row);
        let bottom = top + 1.0;
        points.push_front(Point::new(start, top));
        points.push_back(Point::new(end, top));
        points.push_front(Point::new(start, bottom));
        points.push_back(Point::new(end, bottom));
    }

    Geometry::Polygon {
        points: points.into_iter().collect(),
    }
}
