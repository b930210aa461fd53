//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, resize, and crop. All writes happen in place: the
//! result replaces the file it was read from.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image` crate.

use super::params::{CropParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("Crop zoom rate is only computed without an output width; no output width was given")]
    MissingOutputWidth,
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations own every resource they open for the duration of a call
/// and release it before returning, whether the call succeeds or not.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize a file in place to fit the given box.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Fit-resize a file in place, then crop it.
    ///
    /// Returns the size written, which is smaller than the requested region
    /// when the region runs past the scaled image.
    fn crop(&self, params: &CropParams) -> Result<Dimensions, BackendError>;
}
