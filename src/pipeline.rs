use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{self, SourceFormat};
use crate::error::PipelineError;
use crate::exif::MetadataContainer;
use crate::resolver::{self, Resolution};

/// One input file under processing.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl ImageRecord {
    /// Build a record from a path, if its extension names a supported format.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let format = SourceFormat::from_path(&path)?;
        Some(Self { path, format })
    }
}

/// Terminal state of one successfully processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The source already carried a capture timestamp and was copied verbatim.
    CopiedUnchanged,
    /// A timestamp was fabricated from the file's modified time and a new
    /// JPEG was written.
    TimestampSynthesized,
}

/// Collect supported image files from a single directory, non-recursively.
///
/// Only `.jpg`, `.jpeg`, and `.png` entries (case-insensitive) are included.
/// An unreadable directory is a configuration fault: there is nothing to
/// recover per-item before the batch even starts.
pub fn discover_images(input_dir: &Path) -> Result<Vec<ImageRecord>, PipelineError> {
    let entries = fs::read_dir(input_dir).map_err(|e| {
        PipelineError::Configuration(format!(
            "cannot read input directory {}: {e}",
            input_dir.display()
        ))
    })?;

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            PipelineError::Configuration(format!("cannot enumerate {}: {e}", input_dir.display()))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match ImageRecord::from_path(path) {
            Some(record) => records.push(record),
            None => log::debug!("skipping unsupported file: {}", entry.path().display()),
        }
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(records)
}

/// Run one image through the full per-item state machine:
/// decode → read metadata → resolve → copy through or re-encode.
///
/// The file's modified time is read here, not at discovery, so the value the
/// resolver sees reflects the file as it is being processed.
pub fn process_image(
    record: &ImageRecord,
    output_dir: &Path,
) -> Result<ProcessingOutcome, PipelineError> {
    let pixels = codec::decode(&record.path, record.format)?;
    let mut container = MetadataContainer::read(&record.path);

    let modified = fs::metadata(&record.path)
        .and_then(|m| m.modified())
        .map_err(|source| PipelineError::UnreadableFile {
            path: record.path.clone(),
            source,
        })?;

    match resolver::resolve(&container, modified) {
        Resolution::AlreadyPresent => {
            let dest = codec::copy_through_path(&record.path, output_dir);
            warn_on_collision(&dest);
            codec::copy_through(&record.path, &dest)?;
            log::debug!("copied unchanged: {}", record.path.display());
            Ok(ProcessingOutcome::CopiedUnchanged)
        }
        Resolution::NeedsSynthesis(timestamp) => {
            container.set_capture_timestamp(&timestamp);
            let dest = codec::synthesized_path(&record.path, output_dir);
            warn_on_collision(&dest);
            let bytes = codec::encode(&pixels, container.serialize(), &dest)?;
            fs::write(&dest, bytes).map_err(|source| PipelineError::WriteFailure {
                path: dest.clone(),
                source,
            })?;
            log::debug!(
                "synthesized {timestamp} for {} -> {}",
                record.path.display(),
                dest.display()
            );
            Ok(ProcessingOutcome::TimestampSynthesized)
        }
    }
}

/// Sources with the same stem map to the same output (`a.jpg` and `a.png`
/// both become `a.jpg`); the last writer wins, so at least say so.
fn warn_on_collision(dest: &Path) {
    if dest.exists() {
        log::warn!("overwriting existing output: {}", dest.display());
    }
}
