//! Embedded metadata handling.
//!
//! [`MetadataContainer`] is the in-memory view of an image's EXIF tag set.
//! Reading never fails — a file without a metadata block (or with one that
//! cannot be parsed) produces an empty container, so the rest of the pipeline
//! only ever deals with a container, present or not.

mod container;

pub use container::MetadataContainer;
