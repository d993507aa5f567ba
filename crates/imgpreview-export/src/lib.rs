//! imgpreview-export: Pure format serializers for img-preview output
//! (sans-IO).
//!
//! Currently only the SVG element model and serializer. All functions
//! return `String`s; writing to disk is the batch layer's concern.

pub mod svg;

pub use svg::{Element, VectorDocument, document_from_outline, format_number};
