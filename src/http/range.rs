//! HTTP `Range` header parsing.
//!
//! Single-range, `bytes` unit only. Multi-range headers and anything
//! unparseable degrade to "no range" so the caller serves the full file.

/// Half-open byte interval `[start, end)` requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte to serve.
    pub start: u64,
    /// One past the last byte to serve.
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    #[cfg(test)]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }
}

/// Parse a `Range` request header against the total file size.
///
/// Supported forms:
/// - `bytes=A-B` - explicit interval, served as `[A, B+1)`
/// - `bytes=-N` - the last N bytes of the file
///
/// Returns `None` for an absent header, a non-`bytes` unit, multiple
/// comma-separated ranges, a reversed interval, or unparseable bounds.
/// A range whose start lies at or beyond the file size is still returned
/// so the responder can answer 416 instead of silently ignoring it.
pub fn parse_range_header(header: Option<&str>, size: u64) -> Option<ByteRange> {
    let spec = header?.strip_prefix("bytes=")?;

    // Multiple byte ranges are refused outright, not split.
    if spec.contains(',') {
        return None;
    }

    // Suffix form "-N": the last N bytes. A suffix longer than the file
    // covers the whole file.
    if let Some(suffix) = spec.strip_prefix('-') {
        let n: u64 = suffix.trim().parse().ok()?;
        return Some(ByteRange {
            start: size.saturating_sub(n),
            end: size,
        });
    }

    let (start_str, end_str) = spec.split_once('-')?;
    let start: u64 = start_str.trim().parse().ok()?;
    let last: u64 = end_str.trim().parse().ok()?;
    if last < start {
        return None;
    }
    Some(ByteRange {
        start,
        end: last.saturating_add(1),
    })
}
