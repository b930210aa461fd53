//! Public paths and the static root they resolve against.
//!
//! A public path is what a browser requests (`/images/foo.png`); the static
//! root is the directory serving it (`public/`). Both the rewriter's
//! modify-code lookup and the in-place image transforms go through
//! [`StaticRoot::resolve`].

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of modify codes for public paths.
///
/// Returns `Ok(None)` when nothing exists at the path. Errors are reserved
/// for files that exist but cannot be inspected.
pub trait ModifySource: Send + Sync {
    fn modify_code(&self, public_path: &str) -> io::Result<Option<i64>>;
}

/// Filesystem static root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoot {
    root: PathBuf,
}

impl StaticRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a public path onto the filesystem.
    ///
    /// The leading slash is optional. Returns `None` for paths that climb out
    /// of the root through `..`.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ModifySource for StaticRoot {
    fn modify_code(&self, public_path: &str) -> io::Result<Option<i64>> {
        let Some(path) = self.resolve(public_path) else {
            return Ok(None);
        };
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(Some(epoch_secs(metadata.modified()?)))
    }
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Whole seconds since the epoch, rounded down (negative before 1970).
pub fn epoch_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs_f64().ceil() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{mtime_secs, setup_static_root, touch};
    use std::time::Duration;

    #[test]
    fn resolve_strips_leading_slashes() {
        let root = StaticRoot::new("/srv/public");
        assert_eq!(
            root.resolve("/images/foo.png"),
            Some(PathBuf::from("/srv/public/images/foo.png"))
        );
        assert_eq!(
            root.resolve("images/foo.png"),
            Some(PathBuf::from("/srv/public/images/foo.png"))
        );
        assert_eq!(
            root.resolve("//images/foo.png"),
            Some(PathBuf::from("/srv/public/images/foo.png"))
        );
    }

    #[test]
    fn resolve_rejects_parent_components() {
        let root = StaticRoot::new("/srv/public");
        assert_eq!(root.resolve("/images/../../etc/passwd"), None);
        assert_eq!(root.resolve("../secret"), None);
    }

    #[test]
    fn modify_code_for_existing_file() {
        let site = setup_static_root();
        let path = touch(&site, "/images/foo");

        let root = StaticRoot::new(site.path());
        assert_eq!(root.modify_code("/images/foo").unwrap(), Some(mtime_secs(&path)));
    }

    #[test]
    fn modify_code_without_leading_slash() {
        let site = setup_static_root();
        let path = touch(&site, "/images/foo");

        let root = StaticRoot::new(site.path());
        assert_eq!(root.modify_code("images/foo").unwrap(), Some(mtime_secs(&path)));
    }

    #[test]
    fn modify_code_missing_file_is_none() {
        let site = setup_static_root();
        let root = StaticRoot::new(site.path());
        assert_eq!(root.modify_code("/images/nope").unwrap(), None);
    }

    #[test]
    fn modify_code_below_a_file_is_none() {
        let site = setup_static_root();
        touch(&site, "/images/foo");
        let root = StaticRoot::new(site.path());
        assert_eq!(root.modify_code("/images/foo/bar").unwrap(), None);
    }

    #[test]
    fn epoch_secs_rounds_down() {
        assert_eq!(epoch_secs(UNIX_EPOCH + Duration::from_millis(1_500)), 1);
        assert_eq!(epoch_secs(UNIX_EPOCH - Duration::from_millis(1_500)), -2);
        assert_eq!(epoch_secs(UNIX_EPOCH), 0);
    }
}
