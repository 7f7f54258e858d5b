// Configuration structs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::fetch::DEFAULT_FETCH_TIMEOUT;

/// Router options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Name reported in metadata responses
    pub name: String,
    /// Prefix every model path must start with
    pub url_prefix: String,
    /// GETs under this prefix are health checks
    pub health_prefix: String,
    /// Upper bound on a data_url download, in seconds (fractions allowed)
    pub fetch_timeout_secs: f64,
    /// Content-type prefixes treated as binary, in addition to `image/`
    pub binary_content_types: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            name: "ModelRouter".to_string(),
            url_prefix: "/v2/models".to_string(),
            health_prefix: "/v2/health".to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs_f64(),
            binary_content_types: vec![],
        }
    }
}

impl RouterConfig {
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_health_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.health_prefix = prefix.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Download bound; negative or non-finite settings fall back to the default
    pub fn fetch_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.fetch_timeout_secs).unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    /// Whether a body with this content type may be wrapped as raw bytes
    pub fn is_binary_content_type(&self, content_type: &str) -> bool {
        content_type.starts_with("image/")
            || self
                .binary_content_types
                .iter()
                .any(|prefix| !prefix.is_empty() && content_type.starts_with(prefix.as_str()))
    }
}

/// Configuration for the HTTP adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080")
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Kind of handler a declared model is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Echo,
    Remote,
}

/// One entry of the declared model topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Registry key, `name` or `name:version`
    pub name: String,
    pub kind: ModelKind,
    /// Base URL of a remote model
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub router: RouterConfig,
    pub server: ServerConfig,
    pub models: Vec<ModelSpec>,
}
