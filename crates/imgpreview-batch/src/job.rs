//! Conversion jobs: one input image to one output file.
//!
//! A job is an immutable request validated at batch setup and consumed
//! by exactly one worker. Execution decodes the input, fits it into the
//! requested bounding box, and either re-encodes the resized bitmap
//! (PNG/JPEG) or vectorizes it into an SVG document.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use image::ImageFormat;
use imgpreview_export::document_from_outline;
use imgpreview_pipeline::{Dimensions, Speed, VectorizeConfig, scale, vectorize};

use crate::BatchError;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Quality bitmap.
    Png,
    /// Smaller bitmap.
    Jpeg,
    /// Scalable vector approximation.
    Svg,
}

impl Format {
    /// Canonical file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
        }
    }

    /// Codec format for the bitmap path. `None` for SVG, which never
    /// goes through the raster encoder.
    const fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Png => Some(ImageFormat::Png),
            Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Svg => None,
        }
    }
}

/// Conversion method. Only scaling is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Fit the image into a target bounding box.
    #[default]
    Scale,
}

/// An immutable conversion request: owned exclusively by one worker
/// during execution.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Output format.
    pub format: Format,
    /// Input image path.
    pub input: PathBuf,
    /// Output file path. Must not exist; creation is exclusive.
    pub output: PathBuf,
    /// Speed tier for resampling and vectorization.
    pub speed: Speed,
    /// Target bounding-box width in pixels.
    pub width: u32,
    /// Target bounding-box height in pixels.
    pub height: u32,
}

impl ConversionJob {
    /// Check that the job can run: input exists, output does not, and
    /// the target box is at least 1x1.
    ///
    /// The output check is a fast setup-time fail; the exclusive create
    /// in [`run`](Self::run) is the correctness backstop against the
    /// check-then-write race.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.width < 1 || self.height < 1 {
            return Err(BatchError::Config(format!(
                "target size must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.input.exists() {
            return Err(BatchError::Config(format!(
                "input does not exist: {}",
                self.input.display()
            )));
        }
        if self.output.exists() {
            return Err(BatchError::Config(format!(
                "output already exists: {}",
                self.output.display()
            )));
        }
        Ok(())
    }

    /// Execute the conversion and write the output file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Decode`] for unreadable input,
    /// [`BatchError::Encode`] / [`BatchError::Write`] for output
    /// failures, and [`BatchError::Pipeline`] if vectorization fails.
    pub fn run(&self) -> Result<(), BatchError> {
        let decoded = image::open(&self.input).map_err(|source| BatchError::Decode {
            path: self.input.clone(),
            source,
        })?;
        let rgb = decoded.to_rgb8();

        let target = scale::fit_dimensions(
            Dimensions {
                width: rgb.width(),
                height: rgb.height(),
            },
            Dimensions {
                width: self.width,
                height: self.height,
            },
        );
        let resized = scale::resize(&rgb, target, self.speed);

        if let Some(format) = self.format.image_format() {
            let file = self.create_output()?;
            let mut writer = BufWriter::new(file);
            resized
                .write_to(&mut writer, format)
                .map_err(|source| BatchError::Encode {
                    path: self.output.clone(),
                    source,
                })?;
        } else {
            let config = VectorizeConfig {
                speed: self.speed,
                ..VectorizeConfig::default()
            };
            let outline = vectorize(&resized, &config)?;
            let svg = document_from_outline(&outline).to_svg();
            let mut file = self.create_output()?;
            file.write_all(svg.as_bytes())
                .map_err(|source| BatchError::Write {
                    path: self.output.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Exclusive-create the output file; fails if it already exists.
    fn create_output(&self) -> Result<File, BatchError> {
        File::create_new(&self.output).map_err(|source| BatchError::Write {
            path: self.output.clone(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn write_test_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
        .save(path)
        .unwrap();
    }

    fn job(input: &Path, output: &Path, format: Format) -> ConversionJob {
        ConversionJob {
            format,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            speed: Speed::Normal,
            width: 8,
            height: 8,
        }
    }

    #[test]
    fn validate_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(
            &dir.path().join("missing.png"),
            &dir.path().join("out.png"),
            Format::Png,
        );
        assert!(matches!(job.validate(), Err(BatchError::Config(_))));
    }

    #[test]
    fn validate_rejects_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_test_png(&input, 4, 4);
        std::fs::write(&output, b"occupied").unwrap();
        let job = job(&input, &output, Format::Png);
        assert!(matches!(job.validate(), Err(BatchError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_test_png(&input, 4, 4);
        let mut j = job(&input, &dir.path().join("out.png"), Format::Png);
        j.width = 0;
        assert!(matches!(j.validate(), Err(BatchError::Config(_))));
    }

    #[test]
    fn validate_accepts_well_formed_job() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_test_png(&input, 4, 4);
        assert!(job(&input, &dir.path().join("out.png"), Format::Png)
            .validate()
            .is_ok());
    }

    #[test]
    fn png_job_writes_resized_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_test_png(&input, 16, 16);
        job(&input, &output, Format::Png).run().unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!(written.width(), 8);
        assert_eq!(written.height(), 8);
    }

    #[test]
    fn jpeg_job_writes_decodable_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.jpeg");
        write_test_png(&input, 16, 16);
        job(&input, &output, Format::Jpeg).run().unwrap();
        assert!(image::open(&output).is_ok());
    }

    #[test]
    fn svg_job_writes_svg_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.svg");
        write_test_png(&input, 16, 16);
        job(&input, &output, Format::Svg).run().unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg width=\"8\" height=\"8\""));
        assert!(svg.contains("fill:#"));
    }

    #[test]
    fn run_fails_on_corrupt_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"not an image").unwrap();
        let result = job(&input, &dir.path().join("out.png"), Format::Png).run();
        assert!(matches!(result, Err(BatchError::Decode { .. })));
    }

    #[test]
    fn run_refuses_to_overwrite_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_test_png(&input, 4, 4);
        std::fs::write(&output, b"occupied").unwrap();
        let result = job(&input, &output, Format::Png).run();
        assert!(matches!(result, Err(BatchError::Write { .. })));
        // Original contents untouched.
        assert_eq!(std::fs::read(&output).unwrap(), b"occupied");
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_test_png(&input, 32, 16);
        job(&input, &output, Format::Png).run().unwrap();

        // 32x16 into an 8x8 box fits as 8x4.
        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (8, 4));
    }

    #[test]
    fn format_extensions() {
        assert_eq!(Format::Png.extension(), "png");
        assert_eq!(Format::Jpeg.extension(), "jpeg");
        assert_eq!(Format::Svg.extension(), "svg");
    }
}
