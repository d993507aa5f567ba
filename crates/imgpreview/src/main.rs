//! img-preview: batch-convert raster images into compact previews.
//!
//! Each input is fitted into a target bounding box and written either
//! as a resized bitmap (PNG/JPEG) or as a vectorized SVG approximation
//! built from flat-colored shapes. A bounded worker pool runs the batch
//! with the requested parallelism and a progress line on stdout.
//!
//! # Usage
//!
//! ```text
//! img-preview -i photos/*.png -f svg -s slow -o "%f-preview" -j 4
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use imgpreview_batch::{BatchError, ConversionJob, Format, Method, Scheduler, template};
use imgpreview_pipeline::Speed;
use tracing_subscriber::EnvFilter;

/// Convert raster images into compact previews.
///
/// One conversion job runs per input image; up to `--jobs` run
/// concurrently. Failed inputs are logged and skipped without aborting
/// the rest of the batch.
#[derive(Parser)]
#[command(name = "img-preview", version)]
struct Cli {
    /// Input images to convert.
    #[arg(short, long, num_args = 1.., required_unless_present = "about")]
    input: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Number of worker threads for the batch.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=1024))]
    jobs: u32,

    /// Conversion method.
    #[arg(short, long, value_enum, default_value_t = MethodArg::Scale)]
    method: MethodArg,

    /// Output path template: %f = input base name, %i = dispatch
    /// counter (1-based), %t = timestamp. The format's extension is
    /// appended when the template carries none.
    #[arg(short, long, default_value = "%f-preview")]
    output: String,

    /// Conversion speed, trading quality for time.
    #[arg(short, long, value_enum, default_value_t = SpeedArg::Normal)]
    speed: SpeedArg,

    /// Output bounding box in pixels.
    #[arg(short = 'x', long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [128, 128])]
    scale: Vec<u32>,

    /// Display information about the program and exit.
    #[arg(short, long)]
    about: bool,
}

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Quality bitmap.
    Png,
    /// Smaller bitmap.
    Jpeg,
    /// Scalable vector approximation.
    Svg,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Svg => Self::Svg,
        }
    }
}

/// Conversion method flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Fit each image into the target bounding box.
    Scale,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Scale => Self::Scale,
        }
    }
}

/// Speed tier flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SpeedArg {
    /// Fast, low quality.
    Fast,
    /// Default balance.
    Normal,
    /// Slow, high quality.
    Slow,
}

impl From<SpeedArg> for Speed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Fast => Self::Fast,
            SpeedArg::Normal => Self::Normal,
            SpeedArg::Slow => Self::Slow,
        }
    }
}

const ABOUT_TEXT: &str = "\
This program converts images into light-weight preview representations
using one of a few selected algorithms. One use case example is
previewing a large number of images on a website without paying the
bandwidth of serving the originals.";

/// Build one validated job per input, in dispatch order.
///
/// The `%i` counter and `%t` timestamp are assigned here; the scheduler
/// dispatches jobs in this exact order, so the rendered names reflect
/// dispatch order.
fn build_jobs(cli: &Cli) -> Result<Vec<ConversionJob>, BatchError> {
    let format = Format::from(cli.format);
    let Method::Scale = Method::from(cli.method);
    let (width, height) = match cli.scale.as_slice() {
        &[width, height] => (width, height),
        other => {
            return Err(BatchError::Config(format!(
                "expected WIDTH HEIGHT, got {} value(s)",
                other.len()
            )));
        }
    };

    let timestamp = template::dispatch_timestamp();
    let mut jobs = Vec::with_capacity(cli.input.len());
    for (i, input) in cli.input.iter().enumerate() {
        let rendered = template::render(&cli.output, input, i + 1, &timestamp);
        let output = template::ensure_extension(&rendered, format.extension());
        let job = ConversionJob {
            format,
            input: input.clone(),
            output: PathBuf::from(output),
            speed: Speed::from(cli.speed),
            width,
            height,
        };
        job.validate()?;
        jobs.push(job);
    }
    Ok(jobs)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.about {
        println!("{ABOUT_TEXT}");
        return ExitCode::SUCCESS;
    }

    // Setup errors are fatal before any job starts; no partial output.
    let jobs = match build_jobs(&cli) {
        Ok(jobs) => jobs,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let scheduler = match Scheduler::new(jobs.len(), cli.jobs as usize) {
        Ok(scheduler) => scheduler,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = scheduler.state();
    let batch = thread::spawn(move || scheduler.run(jobs));
    while state.completed() < state.total() {
        print!("\rconverting... {:5.1}%", state.progress() * 100.0);
        let _ = std::io::Write::flush(&mut std::io::stdout());
        thread::sleep(Duration::from_millis(50));
    }
    println!("\rconverting... 100.0%");

    let Ok(report) = batch.join() else {
        eprintln!("error: batch worker panicked");
        return ExitCode::FAILURE;
    };
    println!(
        "{} of {} conversion(s) succeeded",
        report.completed - report.failures.len(),
        report.completed,
    );
    for failure in &report.failures {
        tracing::warn!(%failure, "conversion failed");
    }
    ExitCode::SUCCESS
}
