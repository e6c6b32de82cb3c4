//! Adapter configuration: TOML-backed, validated before the adapter is built.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, InertiaConfig, ServerConfig, ViteConfig};
