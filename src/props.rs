//! Prop sources folded into a page.
//!
//! Shared props live on the adapter and are visible to every render. Next
//! props and view data live on the per-request handle. Ambient props are a
//! request extension owned by whatever middleware runs upstream.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::InertiaError;

/// String-keyed prop mapping. `serde_json::Value` covers null, booleans,
/// numbers, strings, sequences and nested maps.
pub type Props = Map<String, Value>;

/// Props inserted into request extensions by upstream middleware.
///
/// Must hold a JSON object; anything else fails the render.
#[derive(Debug, Clone)]
pub struct AmbientProps(pub Value);

impl AmbientProps {
    pub fn new(props: Props) -> Self {
        Self(Value::Object(props))
    }

    pub(crate) fn as_props(&self) -> Result<&Props, InertiaError> {
        match &self.0 {
            Value::Object(map) => Ok(map),
            other => Err(InertiaError::AmbientProps {
                found: value_kind(other),
            }),
        }
    }
}

/// Thread-safe prop mapping shared across requests.
///
/// Written during setup (or rarely afterwards), read on every render.
#[derive(Clone, Default)]
pub struct SharedProps {
    inner: Arc<RwLock<Props>>,
}

impl SharedProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.inner.write().insert(key.into(), value);
    }

    /// A copy of the current mapping.
    pub fn snapshot(&self) -> Props {
        self.inner.read().clone()
    }
}

/// Serializes handler-supplied props, requiring a mapping.
///
/// `null` (e.g. `()`) counts as no props.
pub fn to_props<P: Serialize>(props: P) -> Result<Props, InertiaError> {
    match serde_json::to_value(props)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Props::new()),
        other => Err(InertiaError::PropsNotMapping {
            found: value_kind(&other),
        }),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
