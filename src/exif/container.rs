use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use std::cell::Cell;
use std::panic::{self, UnwindSafe};
use std::path::Path;
use std::sync::Once;

// little_exif as_u8_vec(JPEG) returns: [APP1 marker 2B][length 2B][Exif\0\0 6B][TIFF data]
// img-parts set_exif() expects just the TIFF data (after Exif\0\0)
const JPEG_EXIF_OVERHEAD: usize = 10; // 2 + 2 + 6

thread_local! {
    static IN_EXIF_PARSER: Cell<bool> = const { Cell::new(false) };
}

/// Run `f` with panic output suppressed on the current thread.
///
/// The panic hook is process-global and [`MetadataContainer::read`] runs on
/// every batch worker concurrently, so the hook cannot be swapped in and out
/// per call. Instead a delegating hook is installed exactly once, on first
/// use; it stays silent only for panics raised on a thread that is currently
/// inside the parser and forwards everything else to the hook that was
/// installed before.
fn silence_parser_panics<R>(f: impl FnOnce() -> R + UnwindSafe) -> std::thread::Result<R> {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_EXIF_PARSER.with(Cell::get) {
                prev(info);
            }
        }));
    });

    IN_EXIF_PARSER.with(|flag| flag.set(true));
    let result = panic::catch_unwind(f);
    IN_EXIF_PARSER.with(|flag| flag.set(false));
    result
}

/// The embedded tag set of one image.
///
/// Wraps the full `little_exif` tag list so tags this crate does not
/// interpret survive a re-encode unchanged. The only tag with a typed
/// accessor is `DateTimeOriginal`; everything else is opaque cargo.
///
/// Absence of metadata is a valid state: [`MetadataContainer::read`] returns
/// an empty container when the file has no EXIF block or the block cannot be
/// parsed.
pub struct MetadataContainer {
    meta: Metadata,
}

impl MetadataContainer {
    /// A container with no tags at all.
    pub fn empty() -> Self {
        Self {
            meta: Metadata::new(),
        }
    }

    /// Read the embedded metadata of the image at `path`.
    ///
    /// Never fails: a missing EXIF block, a block little_exif cannot parse,
    /// and a block that makes little_exif panic all yield an empty container.
    pub fn read(path: &Path) -> Self {
        let path_owned = path.to_path_buf();
        // Suppress panics from little_exif on malformed blocks
        let result = silence_parser_panics(move || Metadata::new_from_path(&path_owned));

        match result {
            Ok(Ok(meta)) => {
                log::debug!(
                    "loaded {} EXIF tag(s) from {}",
                    meta.data().len(),
                    path.display()
                );
                Self { meta }
            }
            Ok(Err(e)) => {
                log::debug!("no usable EXIF in {}: {e}", path.display());
                Self::empty()
            }
            Err(_) => {
                log::warn!(
                    "EXIF parser panicked on {}, treating as empty",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    /// The capture timestamp, if the tag is present with a non-empty value.
    ///
    /// A `DateTimeOriginal` tag holding an empty string is a reserved slot,
    /// not a timestamp, and reads as `None`.
    pub fn capture_timestamp(&self) -> Option<&str> {
        self.meta.data().iter().find_map(|tag| match tag {
            ExifTag::DateTimeOriginal(value) => {
                let v = value.trim_end_matches('\0').trim();
                (!v.is_empty()).then_some(v)
            }
            _ => None,
        })
    }

    pub fn has_capture_timestamp(&self) -> bool {
        self.capture_timestamp().is_some()
    }

    /// Insert or overwrite the capture timestamp.
    ///
    /// `value` must already be in the `YYYY:MM:DD HH:MM:SS` wire format; the
    /// Exif IFD is created on serialization if the source had none.
    pub fn set_capture_timestamp(&mut self, value: &str) {
        self.meta.set_tag(ExifTag::DateTimeOriginal(value.to_string()));
    }

    /// Serialize to raw TIFF bytes suitable for an APP1 EXIF segment.
    ///
    /// Returns `None` when there is nothing worth embedding.
    pub fn serialize(&self) -> Option<Vec<u8>> {
        let exif_bytes = self.meta.as_u8_vec(FileExtension::JPEG);
        if exif_bytes.len() > JPEG_EXIF_OVERHEAD {
            Some(exif_bytes[JPEG_EXIF_OVERHEAD..].to_vec())
        } else {
            None
        }
    }
}
