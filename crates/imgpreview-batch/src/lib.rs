//! imgpreview-batch: conversion jobs and the bounded worker-pool
//! scheduler.
//!
//! A [`ConversionJob`](job::ConversionJob) describes one input-to-output
//! conversion; the [`Scheduler`](scheduler::Scheduler) fans a batch of
//! jobs out over up to a configured number of OS worker threads and
//! tracks aggregate progress. Per-job failures are isolated: a failed
//! job is logged and still counts toward completion, so one bad input
//! never aborts the rest of the batch.

use std::path::PathBuf;

pub mod job;
pub mod scheduler;
pub mod template;

pub use job::{ConversionJob, Format, Method};
pub use scheduler::{BatchReport, BatchState, Scheduler, Work};

/// Errors raised while setting up or running a conversion batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Invalid batch or job configuration. Fatal at setup, before any
    /// job starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input image could not be read or decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Input path.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Output image could not be encoded.
    #[error("failed to encode {path}: {source}")]
    Encode {
        /// Output path.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The conversion pipeline itself failed.
    #[error(transparent)]
    Pipeline(#[from] imgpreview_pipeline::PipelineError),
}
