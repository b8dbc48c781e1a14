//! Safe path resolution.
//!
//! Turns decoded URL segments into a single relative path, refusing
//! anything that could escape the asset root. This is the sole
//! injection-prevention boundary; every request passes through it before
//! any filesystem access.

use std::collections::HashMap;
use std::sync::Mutex;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters percent-encoded when a segment is rebuilt: RFC 3986 delimiters
/// plus whitespace, quotes, and the backslash.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

/// Validate segments and join them into a safe relative path.
///
/// `None` means the request is out of bounds: an empty segment, a
/// dot-leading segment (`..`, `.`, hidden files), or an absolute-path
/// injection. Accepted segments are re-encoded and joined with `/`.
pub fn resolve_segments(segments: &[String]) -> Option<String> {
    for segment in segments {
        if segment.is_empty() || segment.starts_with('.') || segment.starts_with('/') {
            return None;
        }
    }
    Some(
        segments
            .iter()
            .map(|s| utf8_percent_encode(s, SEGMENT_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Bounded memo for [`resolve_segments`], shared across requests.
///
/// Asset paths repeat heavily, so both accepted paths and rejections are
/// cached. Once full, the least recently used entry is evicted.
pub struct PathCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

struct CacheInner {
    entries: HashMap<Vec<String>, CacheEntry>,
    tick: u64,
}

struct CacheEntry {
    resolved: Option<String>,
    last_used: u64,
}

impl PathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Memoized [`resolve_segments`].
    pub fn resolve(&self, segments: &[String]) -> Option<String> {
        let Ok(mut inner) = self.inner.lock() else {
            // Poisoned lock: fall back to the uncached computation.
            return resolve_segments(segments);
        };
        inner.tick += 1;
        let tick = inner.tick;

        if let Some(entry) = inner.entries.get_mut(segments) {
            entry.last_used = tick;
            return entry.resolved.clone();
        }

        let resolved = resolve_segments(segments);
        if inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                inner.entries.remove(&key);
            }
        }
        inner.entries.insert(
            segments.to_vec(),
            CacheEntry {
                resolved: resolved.clone(),
                last_used: tick,
            },
        );
        resolved
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_plain_segments() {
        assert_eq!(
            resolve_segments(&segs(&["css", "site.css"])),
            Some("css/site.css".to_string())
        );
    }

    #[test]
    fn test_empty_sequence_is_root() {
        assert_eq!(resolve_segments(&[]), Some(String::new()));
    }

    #[test]
    fn test_rejects_empty_segment() {
        assert_eq!(resolve_segments(&segs(&["a", "", "b"])), None);
    }

    #[test]
    fn test_rejects_dot_segments() {
        assert_eq!(resolve_segments(&segs(&[".."])), None);
        assert_eq!(resolve_segments(&segs(&["a", "..", "b"])), None);
        assert_eq!(resolve_segments(&segs(&["."])), None);
        assert_eq!(resolve_segments(&segs(&[".hidden"])), None);
    }

    #[test]
    fn test_rejects_absolute_injection() {
        assert_eq!(resolve_segments(&segs(&["/etc", "passwd"])), None);
    }

    #[test]
    fn test_reencodes_unsafe_characters() {
        assert_eq!(
            resolve_segments(&segs(&["my file.txt"])),
            Some("my%20file.txt".to_string())
        );
        assert_eq!(
            resolve_segments(&segs(&["a%b"])),
            Some("a%25b".to_string())
        );
    }

    #[test]
    fn test_deterministic() {
        let input = segs(&["img", "logo.png"]);
        assert_eq!(resolve_segments(&input), resolve_segments(&input));
    }

    #[test]
    fn test_cache_returns_same_results() {
        let cache = PathCache::new(16);
        let good = segs(&["js", "app.js"]);
        let bad = segs(&[".."]);
        assert_eq!(cache.resolve(&good), Some("js/app.js".to_string()));
        assert_eq!(cache.resolve(&good), Some("js/app.js".to_string()));
        // Rejections are memoized too.
        assert_eq!(cache.resolve(&bad), None);
        assert_eq!(cache.resolve(&bad), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let cache = PathCache::new(2);
        let a = segs(&["a"]);
        let b = segs(&["b"]);
        let c = segs(&["c"]);
        cache.resolve(&a);
        cache.resolve(&b);
        // Touch `a` so `b` becomes the eviction candidate.
        cache.resolve(&a);
        cache.resolve(&c);
        assert_eq!(cache.len(), 2);
        let inner = cache.inner.lock().unwrap();
        assert!(inner.entries.contains_key(&a));
        assert!(inner.entries.contains_key(&c));
        assert!(!inner.entries.contains_key(&b));
    }
}
