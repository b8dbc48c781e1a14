//! Request dispatch module.
//!
//! Entry point for HTTP request processing: method validation, header
//! extraction, and conversion of responder failures into 500s.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use hyper::{Method, Request, Response, Version};

use crate::handler::AppState;
use crate::http::body::Body;
use crate::http::{self, conditional};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating what the static view consumes.
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<SystemTime>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let is_head = *method == Method::HEAD;

    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    let uri = req.uri();
    let ctx = RequestContext {
        path: uri.path(),
        query: uri.query(),
        is_head,
        if_modified_since: conditional::parse_if_modified_since(header_str(
            &req,
            "if-modified-since",
        )),
        range_header: header_str(&req, "range").map(ToString::to_string),
    };

    let response = match state.view.serve(&ctx).await {
        Ok(response) => response,
        Err(e) => {
            // Validation happened earlier; whatever failed here is a real
            // I/O problem worth surfacing.
            logger::log_error(&format!("Failed to serve '{}': {e}", uri.path()));
            http::build_500_response()
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            req.method().to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_str(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = header_str(&req, "referer").map(ToString::to_string);
        entry.user_agent = header_str(&req, "user-agent").map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Only GET and HEAD reach the file logic.
fn check_http_method(method: &Method) -> Option<Response<Body>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_str<'a>(req: &'a Request<hyper::body::Incoming>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn content_length(response: &Response<Body>) -> u64 {
    response
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
