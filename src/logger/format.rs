//! Access log format module
//!
//! Supports `combined` (Apache/Nginx), `common` (CLF), `json`, and custom
//! patterns with `$variable` substitution.

use chrono::Local;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `GET /path?query HTTP/1.1`
    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// Common Log Format (CLF)
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Apache/Nginx combined format: CLF plus referer and user agent
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        // Hand-built; the shape is flat enough that serde would be overkill.
        format!(
            r#"{{"remote_addr":"{}","time":"{}","request":"{}","status":{},"body_bytes":{},"referer":{},"user_agent":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.request_line()),
            self.status,
            self.body_bytes,
            json_string_or_null(self.referer.as_deref()),
            json_string_or_null(self.user_agent.as_deref()),
            self.request_time_us,
        )
    }

    /// Custom format with `$variable` substitution
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer variables first so `$request` does not clobber
        // `$request_time` or `$request_uri`.
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time_local())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.request_uri())
            .replace("$request", &self.request_line())
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

fn json_string_or_null(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_string(), |v| format!("\"{}\"", escape_json(v)))
}

/// Escape special characters for JSON string
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.7".to_string(),
            "GET".to_string(),
            "/img/logo.png".to_string(),
        );
        entry.query = Some("v=3".to_string());
        entry.status = 206;
        entry.body_bytes = 512;
        entry.referer = Some("https://example.com/".to_string());
        entry.user_agent = Some("curl/8.0".to_string());
        entry.request_time_us = 2500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("10.0.0.7"));
        assert!(log.contains("GET /img/logo.png?v=3 HTTP/1.1"));
        assert!(log.contains("206 512"));
        assert!(log.contains("\"https://example.com/\""));
        assert!(log.contains("\"curl/8.0\""));
    }

    #[test]
    fn test_format_common_omits_referer() {
        let log = create_test_entry().format("common");
        assert!(log.contains("206 512"));
        assert!(!log.contains("example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        assert!(log.contains(r#""remote_addr":"10.0.0.7""#));
        assert!(log.contains(r#""status":206"#));
        assert!(log.contains(r#""body_bytes":512"#));
    }

    #[test]
    fn test_format_json_null_fields() {
        let mut entry = create_test_entry();
        entry.referer = None;
        let log = entry.format("json");
        assert!(log.contains(r#""referer":null"#));
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$remote_addr $status $request_time");
        assert!(log.contains("10.0.0.7"));
        assert!(log.contains("206"));
        // 2500us rounds to 0.003 seconds.
        assert!(log.contains("0.003"));
    }
}
