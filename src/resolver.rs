use chrono::{DateTime, Local};
use std::time::SystemTime;

use crate::exif::MetadataContainer;

/// EXIF DateTimeOriginal wire format. Fixed — standard EXIF consumers
/// expect exactly this shape.
const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// What to do with one image, decided from its metadata alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A capture timestamp already exists — copy the source through unchanged.
    AlreadyPresent,
    /// No usable capture timestamp — write this value and re-encode.
    NeedsSynthesis(String),
}

/// Decide whether an image needs a synthesized capture timestamp.
///
/// Pure function, no I/O. `fallback` is the file's last-modified time; it is
/// only formatted when synthesis is actually needed. A tag present with an
/// empty value counts as absent, the same as a missing tag or a missing
/// metadata block.
pub fn resolve(container: &MetadataContainer, fallback: SystemTime) -> Resolution {
    if container.has_capture_timestamp() {
        Resolution::AlreadyPresent
    } else {
        Resolution::NeedsSynthesis(format_timestamp(fallback))
    }
}

/// Format an instant as EXIF `YYYY:MM:DD HH:MM:SS` in the local time zone,
/// matching how the filesystem presents modification times.
pub fn format_timestamp(instant: SystemTime) -> String {
    DateTime::<Local>::from(instant)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
