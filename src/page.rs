//! Page object composition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::InertiaError;
use crate::headers::Negotiation;
use crate::props::{AmbientProps, Props};

/// The page object sent to the client, as JSON or embedded in the shell.
///
/// Field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    pub props: Props,
    pub url: String,
    pub version: String,
}

impl Page {
    /// The one serialization used for both the JSON response and the
    /// `data-page` attribute.
    pub fn to_json(&self) -> Result<String, InertiaError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Which props a partial reload asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialReload {
    /// Not a partial reload; every prop is sent.
    All,
    /// Only these keys are sent.
    Only(BTreeSet<String>),
    /// Partial headers matched but named no usable key; every prop is sent.
    Empty,
}

impl PartialReload {
    /// Derives the filter for rendering `component`.
    ///
    /// Filtering applies only when the partial-data header is non-empty and
    /// the partial-component header names exactly this component.
    pub fn resolve(negotiation: &Negotiation, component: &str) -> Self {
        let Some(data) = negotiation.partial_data.as_deref() else {
            return PartialReload::All;
        };
        if data.is_empty() || negotiation.partial_component.as_deref() != Some(component) {
            return PartialReload::All;
        }

        let keys: BTreeSet<String> = data
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();

        if keys.is_empty() {
            PartialReload::Empty
        } else {
            PartialReload::Only(keys)
        }
    }

    pub fn includes(&self, key: &str) -> bool {
        match self {
            PartialReload::All | PartialReload::Empty => true,
            PartialReload::Only(keys) => keys.contains(key),
        }
    }
}

/// Per-request inputs to composition other than the props themselves.
pub struct Composer<'a> {
    pub negotiation: &'a Negotiation,
    pub ambient: Option<&'a AmbientProps>,
    pub url: &'a str,
    pub version: &'a str,
}

impl Composer<'_> {
    /// Builds the page for `component`.
    ///
    /// Sources fold in order shared, next, handler, ambient; a later source
    /// overwrites an earlier one on the same key. `next` is drained before
    /// anything can fail, so it is empty when this returns either way.
    pub fn compose(
        &self,
        component: &str,
        shared: Props,
        next: &mut Props,
        handler: Props,
    ) -> Result<Page, InertiaError> {
        let next = std::mem::take(next);
        let filter = PartialReload::resolve(self.negotiation, component);
        if filter != PartialReload::All {
            tracing::debug!(component, ?filter, "Partial reload");
        }

        let ambient = self.ambient.map(AmbientProps::as_props).transpose()?;

        let mut props = Props::new();
        let sources = [Some(shared), Some(next), Some(handler), ambient.cloned()];
        for source in sources.into_iter().flatten() {
            for (key, value) in source {
                if filter.includes(&key) {
                    props.insert(key, value);
                }
            }
        }

        Ok(Page {
            component: component.to_string(),
            props,
            url: self.url.to_string(),
            version: self.version.to_string(),
        })
    }
}
