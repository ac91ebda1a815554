//! Content-addressed image persistence.
//!
//! # Responsibility
//! - Map uploaded image bytes to a stable file name derived from their digest.
//! - Resolve stored file names back to bytes for the image fetch path.
//!
//! # Invariants
//! - File name is `<lowercase sha256 hex>.jpg` of the stored bytes.
//! - Only names of that shape are ever resolved against the image directory.

mod store;

pub use store::{content_file_name, ImageError, ImageResult, ImageStore, IMAGE_EXTENSION};
