use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the exif-backfill crate.
///
/// Decode and write errors are per-item: the batch executor catches them at
/// the item boundary and keeps processing sibling files. `Configuration` is
/// fatal and is reported before any worker starts.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("cannot decode {path} as an image: {source}")]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot read {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to assemble JPEG output for {path}: {reason}")]
    EncodeFailure { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}
