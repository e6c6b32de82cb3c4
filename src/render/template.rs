//! HTML shell templates, rendered with handlebars.

use std::collections::BTreeMap;
use std::path::PathBuf;

use handlebars::Handlebars;
use serde_json::{Map, Value};

use super::{escape_html, RenderError};

/// A value handed to the shell template.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Pre-built markup inserted verbatim.
    Markup(String),
    /// Plain data; every string inside is HTML-escaped.
    Value(Value),
}

impl Slot {
    fn into_data(self) -> Value {
        match self {
            Slot::Markup(html) => Value::String(html),
            Slot::Value(value) => escape_strings(value),
        }
    }
}

pub type Slots = BTreeMap<String, Slot>;

/// Renders a named template with the given slots.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, slots: &Slots) -> Result<String, RenderError>;
}

/// Reads `{root}/{name}.html` on each render and renders it as a
/// handlebars template over the slots.
///
/// Escaping happens when slots are converted, not in the registry, so
/// `{{ inertia }}` and `{{{ inertia }}}` both insert markup as is and
/// block helpers like `{{#if title}}` see the slot values. Missing slots
/// render empty.
pub struct FileTemplates {
    root: PathBuf,
    registry: Handlebars<'static>,
}

impl FileTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self {
            root: root.into(),
            registry,
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.html", name))
    }
}

impl TemplateRenderer for FileTemplates {
    fn render(&self, name: &str, slots: &Slots) -> Result<String, RenderError> {
        let path = self.path_for(name);
        let source = std::fs::read_to_string(&path).map_err(|source| RenderError::Template {
            path: path.clone(),
            source,
        })?;

        let data: Map<String, Value> = slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.clone().into_data()))
            .collect();

        self.registry
            .render_template(&source, &data)
            .map_err(|source| RenderError::TemplateSyntax { path, source })
    }
}

fn escape_strings(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(escape_html(&text)),
        Value::Array(items) => Value::Array(items.into_iter().map(escape_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, escape_strings(value)))
                .collect(),
        ),
        other => other,
    }
}
