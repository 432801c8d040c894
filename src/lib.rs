//! # exif-backfill
//!
//! Guarantee every image in a directory carries an EXIF capture timestamp
//! (`DateTimeOriginal`). Images that already have one are copied through
//! byte-identically; for the rest, a timestamp is fabricated from the file's
//! last-modified time and the image is re-encoded as a JPEG carrying it.
//! PNG inputs are flattened onto a white background, since the output format
//! is always JPEG.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exif_backfill::{batch, config::Config, pipeline};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new(
//!         PathBuf::from("./photos"),
//!         PathBuf::from("./out"),
//!         4, // worker count — compute from the host once, at startup
//!     );
//!     config.validate()?;
//!
//!     let records = pipeline::discover_images(&config.input_dir)?;
//!     let result = batch::run(
//!         &records,
//!         &config.output_dir,
//!         config.effective_jobs(),
//!         |path, event| println!("{}: {event:?}", path.display()),
//!     )?;
//!
//!     println!(
//!         "synthesized {} / {} images",
//!         result.synthesized, result.discovered
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`exif`] — the metadata container (read never fails; absence is a state)
//! - [`resolver`] — the pure copy-vs-synthesize decision
//! - [`codec`] — decode, PNG flattening, JPEG re-encode with embedded EXIF
//! - [`batch`] — bounded-parallelism executor with per-item fault isolation
//! - [`pipeline`] — discovery and the per-item state machine
//! - [`config`] — run configuration, validated before any worker starts

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod exif;
pub mod pipeline;
pub mod resolver;

pub use error::PipelineError;
