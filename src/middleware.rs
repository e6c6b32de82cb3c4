//! Version guard middleware.
//!
//! Runs before every handler: forces a full reload when the client's asset
//! version is stale, hands the handler a [`PageContext`], and on the way out
//! rewrites redirects and stamps the current version.

use axum::body::Body;
use axum::extract::{OriginalUri, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::InertiaError;
use crate::headers::{append_vary, is_xhr, VARY_INERTIA, X_INERTIA_LOCATION, X_INERTIA_VERSION};
use crate::inertia::Inertia;
use crate::request::PageContext;

/// Axum middleware gating requests on asset-version agreement.
///
/// Install with `axum::middleware::from_fn_with_state(inertia, version_guard)`.
pub async fn version_guard(State(inertia): State<Inertia>, req: Request, next: Next) -> Response {
    match guard(inertia, req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn guard(inertia: Inertia, mut req: Request, next: Next) -> Result<Response, InertiaError> {
    let version = inertia.version()?;
    let url = original_url(&req);
    let method = req.method().clone();

    if method == Method::GET && is_xhr(req.headers()) {
        let client_version = req
            .headers()
            .get(X_INERTIA_VERSION)
            .and_then(|v| v.to_str().ok());

        if client_version != Some(version.as_str()) {
            tracing::info!(
                url = %url,
                client = client_version.unwrap_or("<none>"),
                current = %version,
                "Asset version mismatch, forcing full reload"
            );
            return conflict_response(&url);
        }
    }

    req.extensions_mut().insert(PageContext {
        version: version.clone(),
        url,
    });
    req.extensions_mut().insert(inertia);

    let mut response = next.run(req).await;

    let status = rewrite_redirect_status(&method, response.status());
    if status != response.status() {
        tracing::debug!(
            %method,
            from = %response.status(),
            to = %status,
            "Rewrote redirect status"
        );
        *response.status_mut() = status;
    }

    let version = HeaderValue::from_str(&version).map_err(|e| InertiaError::Http(e.to_string()))?;
    let headers = response.headers_mut();
    headers.insert(X_INERTIA_VERSION, version);
    append_vary(headers, VARY_INERTIA);

    Ok(response)
}

/// 302 becomes 303 for PUT, PATCH and DELETE so the follow-up request is a
/// GET instead of a replay of the original verb. Anything else is unchanged.
pub fn rewrite_redirect_status(method: &Method, status: StatusCode) -> StatusCode {
    let unsafe_verb = matches!(*method, Method::PUT | Method::PATCH | Method::DELETE);
    if unsafe_verb && status == StatusCode::FOUND {
        StatusCode::SEE_OTHER
    } else {
        status
    }
}

/// 409 telling the client to reload `url` from scratch.
fn conflict_response(url: &str) -> Result<Response, InertiaError> {
    Ok(Response::builder()
        .status(StatusCode::CONFLICT)
        .header(X_INERTIA_LOCATION, url)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))?)
}

fn original_url(req: &Request) -> String {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| req.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
