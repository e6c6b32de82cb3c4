//! Collaborators for the HTML shell: templates, asset tags and the client
//! route table.

pub mod routes;
pub mod template;
pub mod vite;

use std::path::PathBuf;

use thiserror::Error;

pub use routes::{BaseUrl, RouteTable};
pub use template::{FileTemplates, Slot, Slots, TemplateRenderer};
pub use vite::{AssetTags, ViteAssets};

/// Errors raised while producing the HTML shell.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read template '{path}': {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template '{path}': {source}")]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("Failed to read Vite manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse Vite manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read hot file '{path}': {source}")]
    HotFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize route table: {0}")]
    Routes(#[source] serde_json::Error),
}

/// Escapes text for use inside HTML content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Makes serialized JSON safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` become unicode escapes, which JSON parsers read back as
/// the same characters.
pub fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}
