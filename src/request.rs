//! Per-request handle used by route handlers to render pages.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;

use crate::error::InertiaError;
use crate::headers::Negotiation;
use crate::inertia::Inertia;
use crate::page::{Composer, Page, PartialReload};
use crate::props::{to_props, AmbientProps, Props};
use crate::render::BaseUrl;
use crate::response;

/// Request extension installed by the version guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Asset version computed for this request.
    pub version: String,
    /// Path and query as the client sent them, before any nest rewrite.
    pub url: String,
}

/// Everything a handler needs to render one page.
///
/// Next props and view data staged here belong to this request only.
pub struct InertiaRequest {
    inertia: Inertia,
    context: PageContext,
    negotiation: Negotiation,
    base_url: BaseUrl,
    ambient: Option<AmbientProps>,
    next: Props,
    view_data: Props,
}

impl<S> FromRequestParts<S> for InertiaRequest
where
    S: Send + Sync,
{
    type Rejection = InertiaError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let inertia = parts
            .extensions
            .get::<Inertia>()
            .cloned()
            .ok_or(InertiaError::MissingContext)?;
        let context = parts
            .extensions
            .get::<PageContext>()
            .cloned()
            .ok_or(InertiaError::MissingContext)?;

        Ok(Self {
            inertia,
            context,
            negotiation: Negotiation::from_headers(&parts.headers)?,
            base_url: BaseUrl::from_headers(&parts.headers),
            ambient: parts.extensions.get::<AmbientProps>().cloned(),
            next: Props::new(),
            view_data: Props::new(),
        })
    }
}

impl InertiaRequest {
    /// Stages a prop for the next page rendered from this request.
    pub fn with_prop(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.next.insert(key.into(), value.into());
        self
    }

    /// Stages a template-only value for the HTML shell.
    pub fn with_view_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.view_data.insert(key.into(), value.into());
        self
    }

    pub fn next_props(&self) -> &Props {
        &self.next
    }

    pub fn negotiation(&self) -> &Negotiation {
        &self.negotiation
    }

    pub fn url(&self) -> &str {
        &self.context.url
    }

    pub fn version(&self) -> &str {
        &self.context.version
    }

    /// The partial-reload filter that would apply to `component`.
    pub fn partial_reload(&self, component: &str) -> PartialReload {
        PartialReload::resolve(&self.negotiation, component)
    }

    /// Whether `key` will survive partial-reload filtering for `component`.
    ///
    /// Handlers can check this to skip computing props the client didn't
    /// ask for.
    pub fn wants_prop(&self, component: &str, key: &str) -> bool {
        self.partial_reload(component).includes(key)
    }

    /// Composes the page without writing a response. Staged next props are
    /// consumed whether or not this succeeds.
    pub fn page<P: Serialize>(&mut self, component: &str, props: P) -> Result<Page, InertiaError> {
        let handler = match to_props(props) {
            Ok(handler) => handler,
            Err(err) => {
                self.next.clear();
                return Err(err);
            }
        };

        let composer = Composer {
            negotiation: &self.negotiation,
            ambient: self.ambient.as_ref(),
            url: &self.context.url,
            version: &self.context.version,
        };
        composer.compose(component, self.inertia.shared_props(), &mut self.next, handler)
    }

    /// Renders `component` as JSON or HTML depending on the request.
    pub fn render<P: Serialize>(
        mut self,
        component: &str,
        props: P,
    ) -> Result<Response, InertiaError> {
        let page = self.page(component, props)?;
        let view_data = std::mem::take(&mut self.view_data);
        response::emit(&self.inertia, &page, &self.negotiation, &self.base_url, view_data)
    }
}
