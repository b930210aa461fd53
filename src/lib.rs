//! # imgstamp
//!
//! View helpers for images on a static site: cache-busted image URLs and
//! in-place resizing.
//!
//! ```text
//! reference "bar?a=1", request /images/foo
//!     → /images/foo/bar?modify=1700000000&a=1
//!     → https://cdn.example.com/images/foo/bar?modify=1700000000&a=1
//! ```
//!
//! The `modify` parameter is the referenced file's modification time, so a
//! browser fetches the image again once the file changes. References that are
//! already full URLs pass through untouched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rewrite`] | [`Rewriter`](rewrite::Rewriter): reference + request path → cache-busted path or URL |
//! | [`public`] | Public path → static root mapping and the modify-code lookup |
//! | [`imaging`] | In-place resize-to-width and crop-then-resize on the `image` crate |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI report formatting (plain text and JSON) |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//!
//! # Explicit Context
//!
//! Nothing is global. The static root, CDN host and images prefix are held by
//! the [`Rewriter`](rewrite::Rewriter) built from a
//! [`HelperConfig`](config::HelperConfig), and the current request path is an
//! argument to each call:
//!
//! ```no_run
//! use imgstamp::config::HelperConfig;
//! use imgstamp::rewrite::Rewriter;
//!
//! let rewriter = Rewriter::from_config(&HelperConfig::default())?;
//! let src = rewriter.rewrite_url(Some("hero.jpg"), "/images/posts")?;
//! # Ok::<(), imgstamp::rewrite::RewriteError>(())
//! ```

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod public;
pub mod rewrite;

#[cfg(test)]
pub(crate) mod test_helpers;
