//! Server configuration.

use std::time::Duration;

/// Runtime settings for the room server.
///
/// The binary builds this from command-line flags and environment variables;
/// tests build it directly with short intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Text messages accepted per connection per window
    pub rate_limit: u32,
    pub rate_limit_window: Duration,
    pub heartbeat_interval: Duration,
    pub cleanup_interval: Duration,
    /// Origins allowed to open a WebSocket or call the HTTP API.
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            rate_limit_window: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(30),
            cleanup_interval: Duration::from_secs(300),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Whether a request carrying `origin` may connect.
    /// Requests without an `Origin` header (non-browser clients) are always allowed.
    pub fn is_origin_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(_) if self.allowed_origins.is_empty() => true,
            Some(origin) => self.allowed_origins.iter().any(|allowed| allowed == origin),
        }
    }
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
