//! Shared test utilities: asset trees, a wired-up router and request helpers.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use http_body_util::BodyExt;
use inertia_axum::render::{AssetTags, RenderError};
use inertia_axum::{version_guard, AmbientProps, Config, Inertia, InertiaError, InertiaRequest};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SHELL: &str = "<!DOCTYPE html><html><head><title>{{ title }}</title>{{ vite }}</head>\
<body>{{ inertia }}{{ ziggy }}<footer>{{ footer }}</footer></body></html>";

/// Asset tags without a Vite build: one script per entry.
pub struct StaticAssets;

impl AssetTags for StaticAssets {
    fn entrypoint_markup(&self, entries: &[String]) -> Result<String, RenderError> {
        Ok(entries
            .iter()
            .map(|entry| format!(r#"<script type="module" src="/{}"></script>"#, entry))
            .collect())
    }
}

/// Temp project with an asset directory and the shell template.
pub fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let assets = dir.path().join("resources/js/Pages/Users");
    fs::create_dir_all(&assets).unwrap();
    fs::write(dir.path().join("resources/js/app.js"), "import './bootstrap';").unwrap();
    fs::write(assets.join("Index.vue"), "<template>users</template>").unwrap();

    let views = dir.path().join("resources/views");
    fs::create_dir_all(&views).unwrap();
    fs::write(views.join("app.html"), SHELL).unwrap();
    dir
}

pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.inertia.root = root.join("resources/views").to_string_lossy().into_owned();
    config.inertia.assets_path = root.join("resources/js").to_string_lossy().into_owned();
    config
}

pub fn inertia(root: &Path) -> Inertia {
    Inertia::builder(test_config(root))
        .with_assets(StaticAssets)
        .build()
        .expect("valid config")
}

async fn users(mut page: InertiaRequest) -> Result<Response, InertiaError> {
    page.with_prop("flash", "Saved");
    page.with_view_data("footer", "<b>users</b>");
    page.render("Users/Index", json!({ "a": 1, "b": 2 }))
}

async fn shadowed(mut page: InertiaRequest) -> Result<Response, InertiaError> {
    page.with_prop("k", "next");
    page.render("Shadowed", json!({ "k": "handler" }))
}

/// Stages the `x-flash` header as a next prop, yields, then renders.
async fn flash(mut page: InertiaRequest, headers: HeaderMap) -> Result<Response, InertiaError> {
    let message = headers
        .get("x-flash")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    page.with_prop("flash", message);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    page.render("Flash", ())
}

async fn not_a_mapping(page: InertiaRequest) -> Result<Response, InertiaError> {
    page.render("Broken", vec![1, 2, 3])
}

async fn redirect_back() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/users")]).into_response()
}

async fn insert_ambient(mut req: Request, next: Next) -> Response {
    req.extensions_mut()
        .insert(AmbientProps(json!({ "k": "ambient", "user": "ada" })));
    next.run(req).await
}

async fn insert_bad_ambient(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(AmbientProps(json!("not a map")));
    next.run(req).await
}

/// Router with the version guard over every route.
pub fn app(inertia: Inertia) -> Router {
    let ambient = Router::new()
        .route("/shadowed", get(shadowed))
        .layer(middleware::from_fn(insert_ambient));
    let bad_ambient = Router::new()
        .route("/bad-ambient", get(shadowed))
        .layer(middleware::from_fn(insert_bad_ambient));

    Router::new()
        .route("/users", get(users))
        .route("/users/{id}", put(redirect_back).patch(redirect_back).delete(redirect_back))
        .route("/login", post(redirect_back))
        .route("/broken", get(not_a_mapping))
        .route("/flash", get(flash))
        .merge(ambient)
        .merge(bad_ambient)
        .layer(middleware::from_fn_with_state(inertia, version_guard))
}

/// Router without the guard, to check handlers fail loudly.
pub fn unguarded_app() -> Router {
    Router::new().route("/users", get(users))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("body is JSON")
    }

    /// The raw `data-page` attribute value from an HTML shell.
    pub fn data_page_attr(&self) -> &str {
        let start = self.body.find("data-page=\"").expect("mount element") + "data-page=\"".len();
        let len = self.body[start..].find('"').expect("closing quote");
        &self.body[start..start + len]
    }
}

pub async fn send(app: Router, req: axum::http::Request<Body>) -> TestResponse {
    let response = app.oneshot(req).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).expect("UTF-8 body"),
    }
}

/// A client-side navigation as the Inertia client sends it.
pub fn inertia_get(uri: &str, version: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "localhost:3000")
        .header("x-inertia", "true")
        .header("x-requested-with", "XMLHttpRequest")
        .header("x-inertia-version", version)
        .body(Body::empty())
        .unwrap()
}

/// A first-load browser request.
pub fn browser_get(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "localhost:3000")
        .body(Body::empty())
        .unwrap()
}

pub fn html_unescape(attr: &str) -> String {
    attr.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn serve(app: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}
