//! Color metrics over packed 24-bit RGB pixels.
//!
//! Region comparisons operate on a reduced 12-bit palette (4 bits per
//! channel). The reduction keeps each channel's high nibble; expansion
//! duplicates that nibble into both positions so `0xabc` becomes
//! `0xaabbcc`. All distance math runs on the full 8-bit channels.

use image::Rgb;

/// A packed 24-bit RGB pixel (`0x00RRGGBB`, high byte ignored).
pub type Pixel = u32;

/// Pack an `image` crate RGB pixel into the 24-bit form used throughout
/// the vectorization pipeline.
#[must_use]
pub fn pack(rgb: Rgb<u8>) -> Pixel {
    (u32::from(rgb.0[0]) << 16) | (u32::from(rgb.0[1]) << 8) | u32::from(rgb.0[2])
}

/// Reduce a 24-bit pixel to 12-bit color (4 bits per channel), keeping
/// each channel's high nibble.
#[must_use]
pub const fn reduce(c: Pixel) -> u16 {
    (((c & 0x0000_00F0) >> 4) | ((c & 0x0000_F000) >> 8) | ((c & 0x00F0_0000) >> 12)) as u16
}

/// Re-expand a 12-bit color to 24 bits by duplicating each nibble into
/// both nibble positions of its channel.
#[must_use]
pub const fn expand(reduced: u16) -> Pixel {
    let r = (reduced as u32 & 0xF00) >> 8;
    let g = (reduced as u32 & 0x0F0) >> 4;
    let b = reduced as u32 & 0x00F;
    (r << 20) | (r << 16) | (g << 12) | (g << 8) | (b << 4) | b
}

/// Lowercase 6-digit hex of a reduced color's 24-bit expansion, fixed
/// width, for `fill:#rrggbb` styles.
#[must_use]
pub fn hex(reduced: u16) -> String {
    format!("{:06x}", expand(reduced))
}

/// Euclidean distance between two pixels in RGB space.
///
/// Symmetric, and zero for identical pixels.
#[must_use]
pub fn distance(a: Pixel, b: Pixel) -> f64 {
    let dr = f64::from((a >> 16) & 0xFF) - f64::from((b >> 16) & 0xFF);
    let dg = f64::from((a >> 8) & 0xFF) - f64::from((b >> 8) & 0xFF);
    let db = f64::from(a & 0xFF) - f64::from(b & 0xFF);
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// Weighted per-channel average of an accumulated pixel and one new
/// pixel, where `acc` already represents `weight` pixels.
///
/// Integer arithmetic throughout, matching the run-length color
/// accumulation used by the normal-speed SVG tier.
#[must_use]
pub fn weighted_average(acc: Pixel, weight: u32, next: Pixel) -> Pixel {
    let w = u64::from(weight);
    let avg = |shift: u32| {
        let a = u64::from((acc >> shift) & 0xFF) * w;
        let n = u64::from((next >> shift) & 0xFF);
        (((a + n) / (w + 1)) & 0xFF) as u32
    };
    (avg(16) << 16) | (avg(8) << 8) | avg(0)
}
