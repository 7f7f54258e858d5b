// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{default_config_path, load_config, load_from_path};
pub use settings::{AppConfig, ModelKind, ModelSpec, RouterConfig, ServerConfig};
