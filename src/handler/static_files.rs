//! Static file serving module.
//!
//! Resolves request paths against an asset root and answers with full,
//! partial, conditional, or redirect responses.

use std::io::{self, SeekFrom};
use std::path::Path;
use std::time::Duration;

use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

use crate::assets::path::PathCache;
use crate::assets::{self, AssetLocator};
use crate::config::AssetsConfig;
use crate::handler::router::RequestContext;
use crate::http::body::{self, Body};
use crate::http::{self, conditional, mime, range};
use crate::logger;

/// Serves static files below a configured asset root.
///
/// Built once at startup and shared by every connection.
pub struct StaticView {
    locator: Box<dyn AssetLocator>,
    path_cache: PathCache,
    index: String,
    expires: Option<Duration>,
    chunk_size: usize,
    route_prefix: Option<String>,
}

impl StaticView {
    pub fn from_config(cfg: &AssetsConfig) -> io::Result<Self> {
        let locator = assets::from_spec(&cfg.root, cfg.bundle_dir.as_deref().map(Path::new))?;
        Ok(Self {
            locator,
            path_cache: PathCache::new(cfg.path_cache_capacity),
            index: cfg.index.clone(),
            expires: (cfg.cache_max_age > 0).then(|| Duration::from_secs(cfg.cache_max_age)),
            chunk_size: cfg.chunk_size,
            route_prefix: cfg.route_prefix.clone(),
        })
    }

    /// One line describing the asset root for the startup banner.
    pub fn describe(&self) -> String {
        format!("{}, index {}", self.locator.describe(), self.index)
    }

    /// Serve one request.
    ///
    /// Path validation failures and missing files become 404s here; only
    /// genuine I/O failures on a validated path propagate as errors.
    pub async fn serve(&self, ctx: &RequestContext<'_>) -> io::Result<Response<Body>> {
        let path = self.effective_path(ctx.path);

        let Some(segments) = traversal_segments(path) else {
            return Ok(http::build_404_response());
        };
        let Some(mut rel) = self.path_cache.resolve(&segments) else {
            logger::log_warning(&format!("Out of bounds path rejected: {}", ctx.path));
            return Ok(http::build_404_response());
        };

        if self.locator.is_dir(&rel) {
            // Relative links inside the index only work with a trailing
            // slash, so redirect before touching any file.
            if !ctx.path.ends_with('/') {
                return Ok(http::build_redirect_response(&add_slash_location(
                    ctx.path, ctx.query,
                )));
            }
            rel = if rel.is_empty() {
                self.index.clone()
            } else {
                format!("{rel}/{}", self.index)
            };
        }

        if !self.locator.exists(&rel) {
            return Ok(http::build_404_response());
        }

        self.file_response(&self.locator.real_path(&rel), ctx).await
    }

    /// Build the response for a file the locator confirmed to exist.
    ///
    /// Evaluated in strict order: conditional check, range parsing, range
    /// validation, response assembly. Stat or open failures at this point
    /// are a broken precondition and propagate to the caller.
    async fn file_response(
        &self,
        file_path: &Path,
        ctx: &RequestContext<'_>,
    ) -> io::Result<Response<Body>> {
        let meta = tokio::fs::metadata(file_path).await?;
        let mtime = meta.modified()?;
        let size = meta.len();

        if conditional::not_modified(ctx.if_modified_since, mtime) {
            return Ok(http::build_304_response());
        }

        let range = range::parse_range_header(ctx.range_header.as_deref(), size);
        if let Some(range) = &range {
            if range.start >= size {
                return Ok(http::build_416_response(size));
            }
        }

        let content_type = mime::guess_content_type(file_path);

        match range {
            Some(range) => {
                let end = range.end.min(size);
                let body = if ctx.is_head {
                    body::empty()
                } else {
                    let mut file = File::open(file_path).await?;
                    file.seek(SeekFrom::Start(range.start)).await?;
                    body::file_stream(file, end - range.start, self.chunk_size)
                };
                Ok(http::response::build_partial_response(
                    body,
                    range.start,
                    end,
                    size,
                    content_type,
                    mtime,
                    self.expires,
                ))
            }
            None => {
                let body = if ctx.is_head {
                    body::empty()
                } else {
                    body::file_stream(File::open(file_path).await?, size, self.chunk_size)
                };
                Ok(http::response::build_full_response(
                    body,
                    size,
                    content_type,
                    mtime,
                    self.expires,
                ))
            }
        }
    }

    /// Strip the configured route prefix from the request path.
    fn effective_path<'a>(&self, path: &'a str) -> &'a str {
        match &self.route_prefix {
            Some(prefix) => path.strip_prefix(prefix.as_str()).unwrap_or(path),
            None => path,
        }
    }
}

/// Split a request path into decoded traversal segments.
///
/// Empty segments (doubled or trailing slashes) are dropped here; the
/// resolver re-validates every segment before it is used. `None` means a
/// segment was not valid UTF-8 after decoding.
fn traversal_segments(path: &str) -> Option<Vec<String>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .collect()
}

/// Redirect target for a directory request missing its trailing slash,
/// query string preserved.
fn add_slash_location(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}/?{q}"),
        _ => format!("{path}/"),
    }
}
