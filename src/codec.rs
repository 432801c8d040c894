use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// JPEG encoder quality for synthesized outputs, on the standard 0–100 scale.
pub const JPEG_QUALITY: u8 = 95;

/// Supported input formats, derived from the file extension at discovery time.
///
/// # Example
///
/// ```rust
/// use exif_backfill::codec::SourceFormat;
/// use std::path::Path;
///
/// assert_eq!(SourceFormat::from_path(Path::new("a.png")), Some(SourceFormat::Png));
/// assert_eq!(SourceFormat::from_path(Path::new("b.JPG")), Some(SourceFormat::Jpeg));
/// assert_eq!(SourceFormat::from_path(Path::new("c.gif")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Determine the source format from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Decode the image at `path` into pixel data ready for JPEG encoding.
///
/// PNG sources may carry an alpha channel, which JPEG cannot represent, so
/// they are flattened onto an opaque white background. JPEG sources pass
/// through as plain RGB.
pub fn decode(path: &Path, format: SourceFormat) -> Result<RgbImage, PipelineError> {
    let bytes = fs::read(path).map_err(|source| PipelineError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let img =
        image::load_from_memory(&bytes).map_err(|source| PipelineError::UnreadableImage {
            path: path.to_path_buf(),
            source,
        })?;

    let rgb = match format {
        SourceFormat::Png => flatten_onto_white(img),
        SourceFormat::Jpeg => img.into_rgb8(),
    };
    Ok(rgb)
}

/// Composite an image with possible transparency onto solid white.
fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();

    let mut flat = RgbImage::new(width, height);
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        let blend = |c: u8| (((c as u32) * alpha + 255 * (255 - alpha)) / 255) as u8;
        flat.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }
    flat
}

/// Encode pixels as a JPEG carrying the given EXIF payload.
///
/// The image crate's encoder produces the pixel stream; the EXIF TIFF blob is
/// then spliced in as an APP1 segment via img-parts, which leaves the encoded
/// scan data untouched.
pub fn encode(
    pixels: &RgbImage,
    exif_tiff: Option<Vec<u8>>,
    dest: &Path,
) -> Result<Vec<u8>, PipelineError> {
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
        .encode_image(pixels)
        .map_err(|e| PipelineError::EncodeFailure {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;

    let tiff = match exif_tiff {
        Some(tiff) => tiff,
        None => return Ok(encoded),
    };

    let mut jpeg =
        Jpeg::from_bytes(Bytes::from(encoded)).map_err(|e| PipelineError::EncodeFailure {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
    jpeg.set_exif(Some(Bytes::from(tiff)));
    Ok(jpeg.encoder().bytes().to_vec())
}

/// Byte-for-byte copy for images whose timestamp already exists.
pub fn copy_through(source: &Path, dest: &Path) -> Result<(), PipelineError> {
    fs::copy(source, dest).map_err(|source_err| PipelineError::WriteFailure {
        path: dest.to_path_buf(),
        source: source_err,
    })?;
    Ok(())
}

/// Destination path for a synthesized output: base name kept, extension
/// forced to `.jpg` regardless of source format.
pub fn synthesized_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".jpg");
    output_dir.join(name)
}

/// Destination path for a copy-through output: name and extension preserved.
pub fn copy_through_path(source: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(source.file_name().unwrap_or_default())
}
