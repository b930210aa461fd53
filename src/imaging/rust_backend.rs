//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::ImageReader` with format sniffing |
//! | Resize | `image::DynamicImage::resize` (aspect-preserving fit) |
//! | Crop | `image::DynamicImage::crop_imm` (clamped to image bounds) |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |
//! | Encode other formats | `image::DynamicImage::write_to` |
//!
//! Encoded output is buffered in memory and written over the source file only
//! once encoding has succeeded, so a failed encode leaves the original intact.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CropParams, Quality, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image, returning it with the format it was stored in.
fn load_image(path: &Path) -> Result<(DynamicImage, ImageFormat), BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .or_else(|| ImageFormat::from_path(path).ok())
        .ok_or_else(|| {
            BackendError::ProcessingFailed(format!("Unknown image format: {}", path.display()))
        })?;
    let img = reader.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })?;
    Ok((img, format))
}

/// Encode `img` as `format` and overwrite `path`.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let mut buf = Cursor::new(Vec::new());
    let encoded = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            rgb.write_with_encoder(encoder)
        }
        other => img.write_to(&mut buf, other),
    };
    encoded.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })?;
    std::fs::write(path, buf.into_inner())?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let (img, format) = load_image(&params.path)?;
        let resized = img.resize(params.width, params.height, params.filter.into());
        debug!(
            path = %params.path.display(),
            width = resized.width(),
            height = resized.height(),
            "resized"
        );
        save_image(&resized, &params.path, format, params.quality)
    }

    fn crop(&self, params: &CropParams) -> Result<Dimensions, BackendError> {
        let (img, format) = load_image(&params.path)?;
        let fitted = img.resize(params.fit_width, params.fit_height, params.filter.into());
        let cropped = fitted.crop_imm(params.x, params.y, params.width, params.height);
        if cropped.width() == 0 || cropped.height() == 0 {
            return Err(BackendError::InvalidDimensions(format!(
                "crop region ({}, {}) lies outside the {}x{} scaled image",
                params.x,
                params.y,
                fitted.width(),
                fitted.height()
            )));
        }
        debug!(
            path = %params.path.display(),
            width = cropped.width(),
            height = cropped.height(),
            "cropped"
        );
        save_image(&cropped, &params.path, format, params.quality)?;
        Ok(Dimensions {
            width: cropped.width(),
            height: cropped.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::ResampleFilter;
    use crate::test_helpers::write_test_image;
    use tempfile::TempDir;

    #[test]
    fn identify_reads_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_image(&path, 64, 32);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions { width: 64, height: 32 });
    }

    #[test]
    fn identify_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = RustBackend::new().identify(&tmp.path().join("missing.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn resize_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_image(&path, 200, 100);

        let backend = RustBackend::new();
        backend
            .resize(&ResizeParams {
                path: path.clone(),
                width: 100,
                height: 50,
                quality: Quality::default(),
                filter: ResampleFilter::Triangle,
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (100, 50));
    }

    #[test]
    fn resize_keeps_jpeg_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        write_test_image(&path, 120, 80);

        RustBackend::new()
            .resize(&ResizeParams {
                path: path.clone(),
                width: 60,
                height: 40,
                quality: Quality::new(80),
                filter: ResampleFilter::Lanczos3,
            })
            .unwrap();

        let reader = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
        assert_eq!(image::image_dimensions(&path).unwrap(), (60, 40));
    }

    #[test]
    fn crop_fits_then_cuts_region() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_image(&path, 400, 200);

        // 400x200 fits a 100x100 box as 100x50; region 10,10 + 40x30
        RustBackend::new()
            .crop(&CropParams {
                path: path.clone(),
                fit_width: 100,
                fit_height: 100,
                x: 10,
                y: 10,
                width: 40,
                height: 30,
                quality: Quality::default(),
                filter: ResampleFilter::Triangle,
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (40, 30));
    }

    #[test]
    fn crop_region_clamped_to_bounds() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_image(&path, 100, 100);

        let out = RustBackend::new()
            .crop(&CropParams {
                path: path.clone(),
                fit_width: 100,
                fit_height: 100,
                x: 80,
                y: 90,
                width: 50,
                height: 50,
                quality: Quality::default(),
                filter: ResampleFilter::Nearest,
            })
            .unwrap();

        assert_eq!(out, Dimensions { width: 20, height: 10 });
        assert_eq!(image::image_dimensions(&path).unwrap(), (20, 10));
    }

    #[test]
    fn crop_outside_image_is_error_and_keeps_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_image(&path, 50, 50);
        let before = std::fs::read(&path).unwrap();

        let result = RustBackend::new().crop(&CropParams {
            path: path.clone(),
            fit_width: 50,
            fit_height: 50,
            x: 60,
            y: 0,
            width: 10,
            height: 10,
            quality: Quality::default(),
            filter: ResampleFilter::Nearest,
        });

        assert!(matches!(result, Err(BackendError::InvalidDimensions(_))));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn corrupt_file_is_processing_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let result = RustBackend::new().resize(&ResizeParams {
            path,
            width: 10,
            height: 10,
            quality: Quality::default(),
            filter: ResampleFilter::Nearest,
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
