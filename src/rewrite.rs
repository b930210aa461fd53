//! Cache-busted image paths and URLs.
//!
//! [`Rewriter`] turns an image reference, as written in a page, into the path
//! or URL the page should emit. A reference is one of:
//!
//! - a full URL (`http://…`, `https://…`): returned untouched;
//! - an absolute path (`/foo.png`): placed under the images prefix
//!   (`/images/foo.png`);
//! - a relative path (`foo.png`): joined onto the current request path.
//!
//! When the resolved file exists under the static root, its modification time
//! is prepended to the query as `modify=<epoch>`, so browsers fetch the file
//! again after it changes:
//!
//! ```text
//! request /images/foo, reference "bar?a=1"  →  /images/foo/bar?modify=1700000000&a=1
//! ```
//!
//! The query of a reference is whatever follows its **last** `?`; the path is
//! whatever precedes its first.

use crate::config::HelperConfig;
use crate::public::{ModifySource, StaticRoot};
use thiserror::Error;
use tracing::debug;
use url::{Position, Url};

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid CDN host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
}

/// Rewrites image references into cache-busted paths and CDN URLs.
#[derive(Debug, Clone)]
pub struct Rewriter<S = StaticRoot> {
    source: S,
    base: Url,
    images_prefix: String,
}

impl Rewriter<StaticRoot> {
    /// Build a rewriter over the configured static root and CDN host.
    pub fn from_config(config: &HelperConfig) -> Result<Self, RewriteError> {
        Self::new(
            StaticRoot::new(&config.static_root),
            &config.urls.cdn_hostname,
            &config.urls.images_prefix,
        )
    }
}

impl<S: ModifySource> Rewriter<S> {
    pub fn new(source: S, cdn_host: &str, images_prefix: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            source,
            base: cdn_base(cdn_host)?,
            images_prefix: images_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Host fully-qualified URLs are built against.
    pub fn cdn_host(&self) -> &str {
        &self.base[Position::BeforeHost..Position::AfterPort]
    }

    /// Rewrite `reference` into a path plus query string.
    ///
    /// Returns `None` only when `reference` is `None`.
    pub fn rewrite_path(
        &self,
        reference: Option<&str>,
        request_path: &str,
    ) -> Result<Option<String>, RewriteError> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        Ok(Some(match self.rewrite(reference, request_path)? {
            Rewritten::Passthrough => reference.to_string(),
            Rewritten::Built(url) => url[Position::BeforePath..].to_string(),
        }))
    }

    /// Rewrite `reference` into a fully-qualified `https://{cdn_host}` URL.
    ///
    /// Returns `None` only when `reference` is `None`.
    pub fn rewrite_url(
        &self,
        reference: Option<&str>,
        request_path: &str,
    ) -> Result<Option<String>, RewriteError> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        Ok(Some(match self.rewrite(reference, request_path)? {
            Rewritten::Passthrough => reference.to_string(),
            Rewritten::Built(url) => url.into(),
        }))
    }

    /// Modify code of a public path, if a file exists there.
    pub fn modify_code(&self, public_path: &str) -> Result<Option<i64>, RewriteError> {
        let path = if public_path.starts_with('/') {
            public_path.to_string()
        } else {
            format!("/{public_path}")
        };
        Ok(self.source.modify_code(&path)?)
    }

    /// Resolve a non-URL reference against the request path.
    ///
    /// The result still carries the reference's query, if any.
    pub fn resolve(&self, reference: &str, request_path: &str) -> String {
        if reference.starts_with('/') {
            format!("{}{reference}", self.images_prefix)
        } else if request_path.ends_with('/') {
            format!("{request_path}{reference}")
        } else {
            format!("{request_path}/{reference}")
        }
    }

    fn rewrite(&self, reference: &str, request_path: &str) -> Result<Rewritten, RewriteError> {
        if is_fully_qualified(reference) {
            debug!(reference, "passing through fully-qualified URL");
            return Ok(Rewritten::Passthrough);
        }

        let resolved = self.resolve(reference, request_path);
        let path = normalize_path(strip_query(&resolved));
        let modify_code = self.modify_code(&path)?;
        let query = merge_query(modify_code, original_query(reference));
        debug!(reference, request_path, path, ?modify_code, "rewrote image reference");

        let mut url = self.base.clone();
        url.set_path(&path);
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(Rewritten::Built(url))
    }
}

enum Rewritten {
    Passthrough,
    Built(Url),
}

fn cdn_base(host: &str) -> Result<Url, RewriteError> {
    let invalid = |reason: String| RewriteError::InvalidHost {
        host: host.to_string(),
        reason,
    };
    let base = Url::parse(&format!("https://{host}/")).map_err(|e| invalid(e.to_string()))?;
    if base.path() != "/"
        || base.query().is_some()
        || base.fragment().is_some()
        || !base.username().is_empty()
    {
        return Err(invalid("expected a bare host, optionally with a port".into()));
    }
    Ok(base)
}

/// `http://` or `https://` prefix.
pub fn is_fully_qualified(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Everything before the first `?`.
fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(before, _)| before)
}

/// Everything after the last `?`, or `""` without one.
fn original_query(reference: &str) -> &str {
    reference.rsplit_once('?').map_or("", |(_, after)| after)
}

/// Collapse `.` and `..` segments the way [`Url::set_path`] does, so the file
/// looked up is the one the emitted URL names.
///
/// Tabs and newlines are dropped and `\` counts as `/`. `..` never climbs
/// above the root.
fn normalize_path(path: &str) -> String {
    let cleaned: String = path
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .map(|c| if c == '\\' { '/' } else { c })
        .collect();
    let body = cleaned.strip_prefix('/').unwrap_or(&cleaned);

    let mut segments: Vec<&str> = Vec::new();
    let mut ends_in_dot = false;
    for segment in body.split('/') {
        ends_in_dot = true;
        if is_single_dot(segment) {
            continue;
        }
        if is_double_dot(segment) {
            segments.pop();
            continue;
        }
        ends_in_dot = false;
        segments.push(segment);
    }
    if ends_in_dot {
        segments.push("");
    }
    format!("/{}", segments.join("/"))
}

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

fn merge_query(modify_code: Option<i64>, query: &str) -> String {
    match modify_code {
        Some(code) if query.is_empty() => format!("modify={code}"),
        Some(code) => format!("modify={code}&{query}"),
        None => query.to_string(),
    }
}
