//! SVG element model and serializer.
//!
//! A [`VectorDocument`] is an ordered sequence of shape elements over a
//! viewport; insertion order is draw order (earlier elements render
//! beneath later ones). Serialization is a pure function returning a
//! `String` -- no I/O here.
//!
//! Numeric attribute values follow the compact rule used throughout the
//! output format: integral values emit no decimal point, everything
//! else emits its minimal decimal representation.

use std::fmt::Write;

use imgpreview_pipeline::{Geometry, OutlineShape, VectorOutline, color};

/// Render a coordinate or dimension value as compactly as possible.
///
/// `10.0` serializes as `"10"`, `10.5` as `"10.5"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// One SVG shape element: a rectangle or polygon with an optional
/// style string.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    geometry: Geometry,
    style: Option<String>,
}

impl Element {
    /// Create an unstyled element.
    #[must_use]
    pub const fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            style: None,
        }
    }

    /// Return a new element with `style` appended.
    ///
    /// Styles are semicolon-joined key:value pairs, append-only. The
    /// builder consumes `self` and returns a new value; the original
    /// is never mutated in place.
    #[must_use]
    pub fn with_style(self, style: &str) -> Self {
        let style = match self.style {
            Some(existing) if !existing.is_empty() => format!("{existing};{style}"),
            _ => style.to_owned(),
        };
        Self {
            geometry: self.geometry,
            style: Some(style),
        }
    }

    /// The accumulated style string, if any.
    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// The element's geometry.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Write this element as a single SVG tag.
    fn write_svg(&self, out: &mut String) {
        let style_attr = self
            .style
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| format!(" style=\"{s}\""))
            .unwrap_or_default();

        match &self.geometry {
            Geometry::Rect {
                x,
                y,
                width,
                height,
            } => {
                let _ = writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}"{style_attr}/>"#,
                    format_number(*x),
                    format_number(*y),
                    format_number(*width),
                    format_number(*height),
                );
            }
            Geometry::Polygon { points } => {
                let joined = points
                    .iter()
                    .map(|p| format!("{},{}", format_number(p.x), format_number(p.y)))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(out, r#"  <polygon points="{joined}"{style_attr}/>"#);
            }
        }
    }
}

/// An ordered SVG document: viewport, optional raw defines, and shape
/// elements in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorDocument {
    width: u32,
    height: u32,
    defines: Vec<String>,
    elements: Vec<Element>,
}

impl VectorDocument {
    /// Create an empty document with the given viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            defines: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Append a raw definition emitted inside `<defs>`.
    pub fn push_define(&mut self, define: impl Into<String>) {
        self.defines.push(define.into());
    }

    /// Append an element. Insertion order is draw order.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the document to SVG text.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#
        );
        let _ = writeln!(
            out,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
            w = self.width,
            h = self.height,
        );
        if !self.defines.is_empty() {
            let _ = write!(out, "  <defs>");
            for define in &self.defines {
                let _ = write!(out, "{define}");
            }
            let _ = writeln!(out, "</defs>");
        }
        for element in &self.elements {
            element.write_svg(&mut out);
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Build a document from a vectorized outline, one styled element per
/// shape. Shape order (draw order) is preserved.
#[must_use]
pub fn document_from_outline(outline: &VectorOutline) -> VectorDocument {
    let mut document = VectorDocument::new(outline.dimensions.width, outline.dimensions.height);
    for OutlineShape { geometry, fill } in &outline.shapes {
        let style = format!("fill:#{}", color::hex(*fill));
        document.push(Element::new(geometry.clone()).with_style(&style));
    }
    document
}
