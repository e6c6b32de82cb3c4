use serde::{Deserialize, Serialize};

use crate::version::DEFAULT_PREFIX_BYTES;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inertia: InertiaConfig,
    #[serde(default)]
    pub vite: ViteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the page adapter itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InertiaConfig {
    /// Directory holding the HTML shell templates.
    #[serde(default = "default_root")]
    pub root: String,
    /// Client asset directory; fingerprinted for the version token.
    #[serde(default = "default_assets_path")]
    pub assets_path: String,
    /// Template name rendered for full page loads (without extension).
    #[serde(default = "default_template")]
    pub template: String,
    /// Element id the client mounts onto.
    #[serde(default = "default_root_element")]
    pub root_element: String,
    /// Bytes of each asset file folded into the fingerprint.
    #[serde(default = "default_prefix_bytes")]
    pub prefix_bytes: usize,
}

/// Vite manifest and dev-server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViteConfig {
    /// Directory containing `manifest.json` after a production build.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    /// File written by the dev server while hot reloading is active.
    #[serde(default = "default_hot_file")]
    pub hot_file: String,
    /// Entry points relative to `assets_path`, emitted on every full load.
    #[serde(default = "default_entrypoints")]
    pub entrypoints: Vec<String>,
    /// Extension of page components under `{assets_path}/Pages`.
    /// `None` disables the per-page entry.
    #[serde(default = "default_page_extension")]
    pub page_extension: Option<String>,
}

/// Settings for the demo server binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_root() -> String {
    "resources/views".to_string()
}

fn default_assets_path() -> String {
    "resources/js".to_string()
}

fn default_template() -> String {
    "app".to_string()
}

fn default_root_element() -> String {
    "app".to_string()
}

fn default_prefix_bytes() -> usize {
    DEFAULT_PREFIX_BYTES
}

fn default_build_dir() -> String {
    "public/build".to_string()
}

fn default_hot_file() -> String {
    "public/hot".to_string()
}

fn default_entrypoints() -> Vec<String> {
    vec!["app.js".to_string()]
}

fn default_page_extension() -> Option<String> {
    Some(".vue".to_string())
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            assets_path: default_assets_path(),
            template: default_template(),
            root_element: default_root_element(),
            prefix_bytes: default_prefix_bytes(),
        }
    }
}

impl Default for ViteConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            hot_file: default_hot_file(),
            entrypoints: default_entrypoints(),
            page_extension: default_page_extension(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}
