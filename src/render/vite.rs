//! Script and stylesheet tags for Vite entry points.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{escape_html, RenderError};

/// Produces the asset markup for a set of entry points.
pub trait AssetTags: Send + Sync {
    fn entrypoint_markup(&self, entries: &[String]) -> Result<String, RenderError>;
}

#[derive(Debug, Deserialize)]
struct ManifestChunk {
    file: String,
    #[serde(default)]
    css: Vec<String>,
}

type Manifest = HashMap<String, ManifestChunk>;

const CSS_EXTENSIONS: &[&str] = &[
    ".css", ".less", ".sass", ".scss", ".styl", ".stylus", ".pcss", ".postcss",
];

/// Vite integration: dev server while the hot file exists, build manifest
/// otherwise. Both files are read on every call.
#[derive(Debug, Clone)]
pub struct ViteAssets {
    build_dir: PathBuf,
    hot_file: PathBuf,
    base_url: String,
}

impl ViteAssets {
    pub fn new(build_dir: impl Into<PathBuf>, hot_file: impl Into<PathBuf>) -> Self {
        let build_dir = build_dir.into();
        let base_url = public_url(&build_dir);
        Self {
            build_dir,
            hot_file: hot_file.into(),
            base_url,
        }
    }

    /// URL prefix for built files. Defaults to the build directory with a
    /// leading `public/` removed, e.g. `/build`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_running_hot(&self) -> bool {
        self.hot_file.is_file()
    }

    fn hot_markup(&self, entries: &[String]) -> Result<String, RenderError> {
        let server = std::fs::read_to_string(&self.hot_file).map_err(|source| {
            RenderError::HotFile {
                path: self.hot_file.clone(),
                source,
            }
        })?;
        let server = server.trim_end();

        let mut html = tag_for(&format!("{}/@vite/client", server));
        for entry in entries {
            html.push_str(&tag_for(&format!("{}/{}", server, entry)));
        }
        Ok(html)
    }

    fn manifest_markup(&self, entries: &[String]) -> Result<String, RenderError> {
        let path = self.build_dir.join("manifest.json");
        let raw = std::fs::read_to_string(&path).map_err(|source| RenderError::ManifestRead {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .map_err(|source| RenderError::ManifestParse { path, source })?;

        let mut html = String::new();
        for entry in entries {
            let Some(chunk) = manifest.get(entry) else {
                tracing::warn!(entry = %entry, "Entry point missing from Vite manifest");
                continue;
            };
            for css in &chunk.css {
                html.push_str(&stylesheet_tag(&format!("{}/{}", self.base_url, css)));
            }
            html.push_str(&script_tag(&format!("{}/{}", self.base_url, chunk.file)));
        }
        Ok(html)
    }
}

impl AssetTags for ViteAssets {
    fn entrypoint_markup(&self, entries: &[String]) -> Result<String, RenderError> {
        if self.is_running_hot() {
            self.hot_markup(entries)
        } else {
            self.manifest_markup(entries)
        }
    }
}

fn public_url(build_dir: &Path) -> String {
    let relative = build_dir.strip_prefix("public").unwrap_or(build_dir);
    let relative = relative.to_string_lossy().replace('\\', "/");
    format!("/{}", relative.trim_matches('/'))
}

fn is_css_path(path: &str) -> bool {
    CSS_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn tag_for(url: &str) -> String {
    if is_css_path(url) {
        stylesheet_tag(url)
    } else {
        script_tag(url)
    }
}

fn stylesheet_tag(url: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{}" />"#, escape_html(url))
}

fn script_tag(url: &str) -> String {
    format!(r#"<script type="module" src="{}"></script>"#, escape_html(url))
}
