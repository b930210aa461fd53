//! Shared test utilities for the imgstamp test suite.
//!
//! Provides a throwaway static root laid out like a site's `public/`
//! directory, plus helpers to drop real image files into it.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_static_root();
//! touch(&site, "/images/foo");
//! let rewriter = rewriter_for(&site);
//! let out = rewriter.rewrite_path(Some("foo"), "/images").unwrap();
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::HelperConfig;
use crate::rewrite::Rewriter;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp static root with an empty `images/` directory.
pub fn setup_static_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("images")).unwrap();
    tmp
}

/// Filesystem path of a public path inside the temp static root.
pub fn public_file(root: &TempDir, public_path: &str) -> PathBuf {
    root.path().join(public_path.trim_start_matches('/'))
}

/// Create an empty file at `public_path`, creating parent directories.
pub fn touch(root: &TempDir, public_path: &str) -> PathBuf {
    let path = public_file(root, public_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"").unwrap();
    path
}

/// Modification time of a file as epoch seconds.
pub fn mtime_secs(path: &Path) -> i64 {
    std::fs::metadata(path)
        .unwrap()
        .modified()
        .unwrap()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Config pointing at the temp static root with a `localhost` CDN host.
pub fn config_for(root: &TempDir) -> HelperConfig {
    HelperConfig {
        static_root: root.path().to_path_buf(),
        ..HelperConfig::default()
    }
}

/// Rewriter over the temp static root.
pub fn rewriter_for(root: &TempDir) -> Rewriter {
    Rewriter::from_config(&config_for(root)).unwrap()
}

// =========================================================================
// Images
// =========================================================================

/// Write a gradient RGB image of the given size; format follows the extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    img.save(path).unwrap();
}
