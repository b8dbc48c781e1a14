//! MIME type guessing.
//!
//! Best-effort Content-Type lookup by file extension. Unknown extensions
//! yield `None` and the response simply omits the header.

use std::path::Path;

/// Guess the Content-Type for a file path from its extension.
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    let content_type = match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(
            guess_content_type(Path::new("index.html")),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(guess_content_type(Path::new("app.js")), Some("application/javascript"));
        assert_eq!(guess_content_type(Path::new("logo.png")), Some("image/png"));
        assert_eq!(guess_content_type(Path::new("clip.mp4")), Some("video/mp4"));
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(guess_content_type(Path::new("PHOTO.JPG")), Some("image/jpeg"));
    }

    #[test]
    fn test_unknown_extension_is_absent() {
        assert_eq!(guess_content_type(Path::new("data.xyz")), None);
        assert_eq!(guess_content_type(Path::new("README")), None);
    }
}
