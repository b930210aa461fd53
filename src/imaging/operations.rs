//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they read the
//! source dimensions, compute parameters, and hand them to the backend, which
//! rewrites the file in place.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_crop_plan, calculate_resize_dimensions};
use super::params::{CropParams, Quality, ResampleFilter, ResizeParams};
use std::path::Path;
use tracing::info;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Encoding settings shared by in-place transforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub quality: Quality,
    pub filter: ResampleFilter,
}

impl From<&crate::config::HelperConfig> for TransformOptions {
    fn from(config: &crate::config::HelperConfig) -> Self {
        Self {
            quality: config.quality(),
            filter: config.imaging.filter,
        }
    }
}

/// Get image dimensions using the backend.
pub fn dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Resize `path` in place so its longer edge matches `new_width`.
///
/// Landscape and square images end up `new_width` wide; portrait images end
/// up `new_width` tall. Returns the planned output size.
pub fn resize_to_width(
    backend: &impl ImageBackend,
    path: &Path,
    new_width: u32,
    options: &TransformOptions,
) -> Result<Dimensions> {
    if new_width == 0 {
        return Err(BackendError::InvalidDimensions(
            "new width must be non-zero".into(),
        ));
    }
    let source = backend.identify(path)?;
    if source.width == 0 || source.height == 0 {
        return Err(BackendError::InvalidDimensions(format!(
            "{} is {}x{}",
            path.display(),
            source.width,
            source.height
        )));
    }

    let (width, height) = calculate_resize_dimensions((source.width, source.height), new_width);
    backend.resize(&ResizeParams {
        path: path.to_path_buf(),
        width,
        height,
        quality: options.quality,
        filter: options.filter,
    })?;

    info!(
        path = %path.display(),
        from = %format!("{}x{}", source.width, source.height),
        to = %format!("{width}x{height}"),
        "resized image"
    );
    Ok(Dimensions { width, height })
}

/// Fit `path` into an `output_width` square, then crop `(x, y)`–`(right, bottom)`.
///
/// `right`/`bottom` are edges of the region, not its size. See
/// [`calculate_crop_plan`] for the known issue around a missing output width.
#[allow(clippy::too_many_arguments)]
pub fn crop_then_resize(
    backend: &impl ImageBackend,
    path: &Path,
    x: u32,
    y: u32,
    right: u32,
    bottom: u32,
    output_width: Option<u32>,
    options: &TransformOptions,
) -> Result<Dimensions> {
    let plan = calculate_crop_plan(x, y, right, bottom, output_width)?;
    let (fit_width, fit_height) = plan.fit;

    let written = backend.crop(&CropParams {
        path: path.to_path_buf(),
        fit_width,
        fit_height,
        x: plan.region.x,
        y: plan.region.y,
        width: plan.region.width,
        height: plan.region.height,
        quality: options.quality,
        filter: options.filter,
    })?;

    info!(
        path = %path.display(),
        region = %format!("{}x{}+{}+{}", plan.region.width, plan.region.height, x, y),
        width = written.width,
        height = written.height,
        "cropped image"
    );
    Ok(written)
}
