//! HTTP response builders.
//!
//! One builder per status the server produces, decoupled from the file
//! resolution logic that decides which one to use.

use std::time::{Duration, SystemTime};

use httpdate::fmt_http_date;
use hyper::body::Bytes;
use hyper::Response;

use super::body::{self, Body};

/// Build 304 Not Modified response. No body, no headers beyond the date.
pub fn build_304_response() -> Response<Body> {
    base_builder()
        .status(304)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(body::empty())
        })
}

/// Build 404 Not Found response.
///
/// Also used for out-of-bounds paths so a client cannot distinguish a
/// blocked traversal from a missing file.
pub fn build_404_response() -> Response<Body> {
    base_builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(body::full(Bytes::from_static(b"404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::empty())
        })
}

/// Build 405 Method Not Allowed response.
pub fn build_405_response() -> Response<Body> {
    base_builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(body::full(Bytes::from_static(b"405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::empty())
        })
}

/// Build OPTIONS response.
pub fn build_options_response() -> Response<Body> {
    base_builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build 416 Range Not Satisfiable response. Empty body.
pub fn build_416_response(file_size: u64) -> Response<Body> {
    base_builder()
        .status(416)
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(body::empty())
        })
}

/// Build 301 redirect response (directory requests missing their
/// trailing slash).
pub fn build_redirect_response(location: &str) -> Response<Body> {
    base_builder()
        .status(301)
        .header("Location", location)
        .header("Content-Type", "text/plain")
        .body(body::full(Bytes::from_static(b"Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(body::empty())
        })
}

/// Build 500 Internal Server Error response for I/O failures that escaped
/// the handler.
pub fn build_500_response() -> Response<Body> {
    base_builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(body::full(Bytes::from_static(b"500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(body::empty())
        })
}

/// Build 200 response streaming the whole file.
pub fn build_full_response(
    body: Body,
    content_length: u64,
    content_type: Option<&'static str>,
    mtime: SystemTime,
    expires: Option<Duration>,
) -> Response<Body> {
    file_builder(content_type, mtime, expires)
        .status(200)
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(body::empty())
        })
}

/// Build 206 Partial Content response streaming bytes `[start, end)`.
pub fn build_partial_response(
    body: Body,
    start: u64,
    end: u64,
    total_size: u64,
    content_type: Option<&'static str>,
    mtime: SystemTime,
    expires: Option<Duration>,
) -> Response<Body> {
    file_builder(content_type, mtime, expires)
        .status(206)
        .header("Content-Length", end - start)
        .header(
            "Content-Range",
            format!("bytes {}-{}/{}", start, end - 1, total_size),
        )
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(body::empty())
        })
}

fn base_builder() -> hyper::http::response::Builder {
    Response::builder().header("Date", fmt_http_date(SystemTime::now()))
}

/// Headers common to 200 and 206 file responses.
fn file_builder(
    content_type: Option<&'static str>,
    mtime: SystemTime,
    expires: Option<Duration>,
) -> hyper::http::response::Builder {
    let now = SystemTime::now();
    let mut builder = Response::builder()
        .header("Date", fmt_http_date(now))
        .header("Last-Modified", fmt_http_date(mtime))
        .header("Accept-Ranges", "bytes");

    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    if let Some(expires) = expires {
        builder = builder
            .header("Expires", fmt_http_date(now + expires))
            .header("Cache-Control", format!("public, max-age={}", expires.as_secs()));
    }
    builder
}

/// Log response build error.
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_304_has_no_content_headers() {
        let resp = build_304_response();
        assert_eq!(resp.status(), 304);
        assert!(resp.headers().get("Content-Type").is_none());
        assert!(resp.headers().get("Content-Length").is_none());
        assert!(resp.headers().get("Date").is_some());
    }

    #[test]
    fn test_416_reports_total_size() {
        let resp = build_416_response(1234);
        assert_eq!(resp.status(), 416);
        assert_eq!(
            resp.headers().get("Content-Range").unwrap(),
            "bytes */1234"
        );
    }

    #[test]
    fn test_redirect_location() {
        let resp = build_redirect_response("/docs/?page=2");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers().get("Location").unwrap(), "/docs/?page=2");
    }

    #[test]
    fn test_full_response_headers() {
        let resp = build_full_response(
            body::empty(),
            42,
            Some("text/css"),
            SystemTime::UNIX_EPOCH,
            Some(Duration::from_secs(3600)),
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "42");
        assert_eq!(resp.headers().get("Content-Type").unwrap(), "text/css");
        assert_eq!(resp.headers().get("Accept-Ranges").unwrap(), "bytes");
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "public, max-age=3600"
        );
        assert!(resp.headers().get("Expires").is_some());
        assert!(resp.headers().get("Last-Modified").is_some());
    }

    #[test]
    fn test_full_response_without_type_or_expiry() {
        let resp = build_full_response(
            body::empty(),
            7,
            None,
            SystemTime::UNIX_EPOCH,
            None,
        );
        assert!(resp.headers().get("Content-Type").is_none());
        assert!(resp.headers().get("Expires").is_none());
        assert!(resp.headers().get("Cache-Control").is_none());
    }

    #[test]
    fn test_partial_response_content_range() {
        let resp = build_partial_response(
            body::empty(),
            900,
            1000,
            1000,
            None,
            SystemTime::UNIX_EPOCH,
            None,
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "100");
        assert_eq!(
            resp.headers().get("Content-Range").unwrap(),
            "bytes 900-999/1000"
        );
    }
}
