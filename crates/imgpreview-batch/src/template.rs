//! Output-path templating.
//!
//! Templates carry three markers, substituted at dispatch time:
//!
//! - `%f` -- the input's base filename, without extension
//! - `%i` -- a 1-based counter reflecting dispatch order (not
//!   completion order)
//! - `%t` -- a timestamp captured at dispatch
//!
//! Unknown `%x` pairs pass through literally. Collisions are not
//! deduplicated; the caller's template choice is responsible for
//! uniqueness.

use std::path::Path;

/// Render an output path from a template.
#[must_use]
pub fn render(template: &str, input: &Path, index: usize, timestamp: &str) -> String {
    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::with_capacity(template.len() + base.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str(&base),
            Some('i') => out.push_str(&index.to_string()),
            Some('t') => out.push_str(timestamp),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Append `.extension` when the rendered path's file name carries none,
/// so templates like `%f-%i` still produce recognizable output files.
#[must_use]
pub fn ensure_extension(rendered: &str, extension: &str) -> String {
    let has_extension = Path::new(rendered)
        .extension()
        .is_some_and(|e| !e.is_empty());
    if has_extension {
        rendered.to_owned()
    } else {
        format!("{rendered}.{extension}")
    }
}

/// Timestamp string for the `%t` marker, captured once per batch at
/// dispatch setup.
#[must_use]
pub fn dispatch_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}
