//! In-place image transforms in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Resize to width** | `DynamicImage::resize` with the configured filter |
//! | **Crop then resize** | `DynamicImage::resize` + `crop_imm` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropPlan, CropRegion, calculate_crop_plan, calculate_resize_dimensions};
pub use operations::{TransformOptions, crop_then_resize, dimensions, resize_to_width};
pub use params::{CropParams, Quality, ResampleFilter, ResizeParams};
pub use rust_backend::RustBackend;
