//! Writes a composed page as JSON or as the HTML shell.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, VARY};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;

use crate::error::InertiaError;
use crate::headers::{Negotiation, X_INERTIA};
use crate::inertia::Inertia;
use crate::page::Page;
use crate::props::Props;
use crate::render::{escape_html, BaseUrl, Slot, Slots};

/// Template slot holding the mount element with the embedded page.
pub const SLOT_INERTIA: &str = "inertia";
/// Template slot holding the route table script.
pub const SLOT_ZIGGY: &str = "ziggy";
/// Template slot holding the asset tags.
pub const SLOT_VITE: &str = "vite";

const RESERVED_SLOTS: [&str; 3] = [SLOT_INERTIA, SLOT_ZIGGY, SLOT_VITE];

/// Chooses JSON or HTML from the negotiation headers.
pub fn emit(
    inertia: &Inertia,
    page: &Page,
    negotiation: &Negotiation,
    base_url: &BaseUrl,
    view_data: Props,
) -> Result<Response, InertiaError> {
    if negotiation.wants_json() {
        tracing::debug!(component = %page.component, "Rendering page as JSON");
        json_response(page)
    } else {
        tracing::debug!(component = %page.component, "Rendering page as HTML");
        html_response(inertia, page, base_url, view_data)
    }
}

/// The page object as an Inertia JSON response.
pub fn json_response(page: &Page) -> Result<Response, InertiaError> {
    let body = page.to_json()?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(VARY, "Accept")
        .header(X_INERTIA, "true")
        .body(Body::from(body))?)
}

/// The mount element for the client, carrying the page in `data-page`.
pub fn mount_markup(root_element: &str, page: &Page) -> Result<String, InertiaError> {
    Ok(format!(
        r#"<div id="{}" data-page="{}"></div>"#,
        escape_html(root_element),
        escape_html(&page.to_json()?)
    ))
}

/// The full HTML shell for a first load.
///
/// View data from the adapter and the request fill extra template slots.
/// It never replaces the three built-in slots.
pub fn html_response(
    inertia: &Inertia,
    page: &Page,
    base_url: &BaseUrl,
    view_data: Props,
) -> Result<Response, InertiaError> {
    let config = inertia.config();

    let mut slots = Slots::new();
    slots.insert(
        SLOT_INERTIA.to_string(),
        Slot::Markup(mount_markup(&config.inertia.root_element, page)?),
    );
    slots.insert(
        SLOT_ZIGGY.to_string(),
        Slot::Markup(inertia.routes().script(base_url)?),
    );
    slots.insert(
        SLOT_VITE.to_string(),
        Slot::Markup(
            inertia
                .assets()
                .entrypoint_markup(&inertia.entrypoints(&page.component))?,
        ),
    );

    for (key, value) in inertia.shared_view_data().into_iter().chain(view_data) {
        if RESERVED_SLOTS.contains(&key.as_str()) {
            tracing::warn!(slot = %key, "View data cannot replace a built-in template slot");
            continue;
        }
        slots.insert(key, Slot::Value(value));
    }

    let html = inertia.templates().render(&config.inertia.template, &slots)?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=UTF-8"))
        .header(VARY, crate::headers::VARY_INERTIA)
        .body(Body::from(html))?)
}
