//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations) (which computes the
//! dimensions) and the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ResampleFilter`]: Resampling filter, configurable from `config.toml`.
//! - [`ResizeParams`]: Resize a file in place to fit a bounding box.
//! - [`CropParams`]: Fit-resize a file, then crop a region, in place.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Resampling filter used when scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for an in-place resize.
///
/// `width`/`height` are a bounding box; the aspect ratio is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub filter: ResampleFilter,
}

/// Parameters for an in-place fit-resize followed by a crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    pub path: PathBuf,
    /// Bounding box the whole image is scaled into before cropping.
    pub fit_width: u32,
    pub fit_height: u32,
    /// Crop region, in the coordinates of the scaled image.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub filter: ResampleFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn filter_maps_to_image_filter() {
        assert_eq!(FilterType::from(ResampleFilter::Lanczos3), FilterType::Lanczos3);
        assert_eq!(FilterType::from(ResampleFilter::Nearest), FilterType::Nearest);
    }
}
