//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::BackendError;

/// Calculate the output size for a resize-to-width.
///
/// The requested width bounds the longer edge: landscape and square images
/// get exactly `new_width` pixels wide, portrait images get `new_width`
/// pixels tall and a proportionally narrower width.
///
/// # Examples
/// ```
/// # use imgstamp::imaging::calculate_resize_dimensions;
/// // 800x600 landscape → 400x300
/// assert_eq!(calculate_resize_dimensions((800, 600), 400), (400, 300));
///
/// // 600x800 portrait → 300x400
/// assert_eq!(calculate_resize_dimensions((600, 800), 400), (300, 400));
/// ```
pub fn calculate_resize_dimensions(source: (u32, u32), new_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let proportion = src_w as f64 / src_h as f64;

    let (w, h) = if proportion < 1.0 {
        // Portrait: the requested size becomes the height
        (new_width as f64 * proportion, new_width as f64)
    } else {
        (new_width as f64, new_width as f64 / proportion)
    };

    (to_pixels(w), to_pixels(h))
}

fn to_pixels(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

/// A crop rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resize-then-crop plan for [`crop_then_resize`](super::operations::crop_then_resize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    /// Bounding box the image is scaled into first.
    pub fit: (u32, u32),
    /// Region cut out of the scaled image.
    pub region: CropRegion,
}

/// Calculate the fit box and crop region for a crop request.
///
/// `right` and `bottom` are edges, not sizes: the region is
/// `(right - x) × (bottom - y)` starting at `(x, y)`.
///
/// With an output width the zoom rate is 1: the image is scaled to fit an
/// `output_width × output_width` box and the region is taken as given.
///
/// Known issue: the zoom-rate computation is guarded by "no output width",
/// so the only branch that would scale the region has nothing to scale to.
/// That branch is kept and reported as [`BackendError::MissingOutputWidth`].
pub fn calculate_crop_plan(
    x: u32,
    y: u32,
    right: u32,
    bottom: u32,
    output_width: Option<u32>,
) -> Result<CropPlan, BackendError> {
    if right <= x || bottom <= y {
        return Err(BackendError::InvalidDimensions(format!(
            "empty crop region: ({x}, {y}) to ({right}, {bottom})"
        )));
    }

    let Some(output_width) = output_width else {
        return Err(BackendError::MissingOutputWidth);
    };
    if output_width == 0 {
        return Err(BackendError::InvalidDimensions(
            "output width must be non-zero".into(),
        ));
    }

    Ok(CropPlan {
        fit: (output_width, output_width),
        region: CropRegion {
            x,
            y,
            width: right - x,
            height: bottom - y,
        },
    })
}
