//! Time-based conditional request handling.
//!
//! Implements the `If-Modified-Since` negotiation used for browser caching.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Parse an `If-Modified-Since` header value.
///
/// Malformed dates are treated as an absent header, matching permissive
/// HTTP semantics.
pub fn parse_if_modified_since(value: Option<&str>) -> Option<SystemTime> {
    value.and_then(|v| httpdate::parse_http_date(v).ok())
}

/// Whether a file with modification time `mtime` is unchanged for a client
/// that sent `since`.
///
/// HTTP dates carry whole-second resolution, so the file time is truncated
/// before comparing; otherwise a client echoing our own `Last-Modified`
/// value would never get a 304.
pub fn not_modified(since: Option<SystemTime>, mtime: SystemTime) -> bool {
    since.is_some_and(|since| truncate_to_secs(mtime) <= since)
}

/// Drop the sub-second part of a timestamp.
pub fn truncate_to_secs(t: SystemTime) -> SystemTime {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => UNIX_EPOCH + Duration::from_secs(d.as_secs()),
        Err(_) => t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64, nanos: u32) -> SystemTime {
        UNIX_EPOCH + Duration::new(secs, nanos)
    }

    #[test]
    fn test_parse_valid_date() {
        let parsed = parse_if_modified_since(Some("Sun, 06 Nov 1994 08:49:37 GMT"));
        assert!(parsed.is_some());
    }

    #[test]
    fn test_parse_malformed_date() {
        assert_eq!(parse_if_modified_since(Some("last tuesday")), None);
        assert_eq!(parse_if_modified_since(None), None);
    }

    #[test]
    fn test_not_modified_at_exact_time() {
        assert!(not_modified(Some(at(1000, 0)), at(1000, 0)));
    }

    #[test]
    fn test_not_modified_with_subsecond_mtime() {
        // A header echoing our truncated Last-Modified must still match.
        assert!(not_modified(Some(at(1000, 0)), at(1000, 500_000_000)));
    }

    #[test]
    fn test_modified_since_older_header() {
        assert!(!not_modified(Some(at(999, 0)), at(1000, 0)));
    }

    #[test]
    fn test_absent_header_means_modified() {
        assert!(!not_modified(None, at(1000, 0)));
    }

    #[test]
    fn test_truncate_to_secs() {
        assert_eq!(truncate_to_secs(at(42, 999_999_999)), at(42, 0));
        assert_eq!(truncate_to_secs(at(42, 0)), at(42, 0));
    }
}
