// Configuration loader
// Loads ~/.model-router/config.toml (or an explicit path), then applies
// environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::AppConfig;

const ENV_BIND: &str = "MODEL_ROUTER_BIND";
const ENV_URL_PREFIX: &str = "MODEL_ROUTER_URL_PREFIX";

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".model-router/config.toml"))
}

/// Load configuration from `path`, the default location, or defaults
///
/// An explicit path must exist; a missing default file just means
/// built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => load_from_path(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => AppConfig::default(),
        },
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML config file
pub fn load_from_path(path: &Path) -> Result<AppConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(bind) = std::env::var(ENV_BIND) {
        if !bind.is_empty() {
            config.server.bind_address = bind;
        }
    }
    if let Ok(prefix) = std::env::var(ENV_URL_PREFIX) {
        if !prefix.is_empty() {
            config.router.url_prefix = prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelKind;
    use std::io::Write;

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[router]
name = "fraud-router"
health_prefix = "/healthz"
fetch_timeout_secs = 60

[server]
bind_address = "0.0.0.0:9000"

[[models]]
name = "m1"
kind = "echo"

[[models]]
name = "m1:v2"
kind = "remote"
url = "http://localhost:9001/m1"
timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.router.name, "fraud-router");
        assert_eq!(config.router.health_prefix, "/healthz");
        assert_eq!(config.router.fetch_timeout(), std::time::Duration::from_secs(60));
        // Unset keys keep their defaults
        assert_eq!(config.router.url_prefix, "/v2/models");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].kind, ModelKind::Echo);
        assert_eq!(config.models[1].url.as_deref(), Some("http://localhost:9001/m1"));
    }

    #[test]
    fn test_fractional_fetch_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[router]\nfetch_timeout_secs = 0.5\n").unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(
            config.router.fetch_timeout(),
            std::time::Duration::from_millis(500)
        );
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[router\nname = ").unwrap();
        assert!(load_from_path(file.path()).is_err());
    }
}
