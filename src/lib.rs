//! Server-side Inertia.js responses for axum.
//!
//! A first visit gets the HTML shell with the page object embedded in the
//! mount element; later client-side navigations get the page object as
//! JSON. The same handler serves both:
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use inertia_axum::{version_guard, Config, Inertia, InertiaError, InertiaRequest};
//! use serde_json::json;
//!
//! async fn users(mut page: InertiaRequest) -> Result<axum::response::Response, InertiaError> {
//!     page.with_prop("flash", "Saved");
//!     page.render("Users/Index", json!({ "users": ["ada", "grace"] }))
//! }
//!
//! let inertia = Inertia::new(Config::load()?)?;
//! inertia.share("appName", "Demo");
//!
//! let app = Router::new()
//!     .route("/users", get(users))
//!     .layer(middleware::from_fn_with_state(inertia, version_guard));
//! ```

pub mod config;
pub mod error;
pub mod headers;
pub mod inertia;
pub mod logging;
pub mod middleware;
pub mod page;
pub mod props;
pub mod render;
pub mod request;
pub mod response;
pub mod version;

pub use config::{Config, ConfigError};
pub use error::InertiaError;
pub use inertia::{Inertia, InertiaBuilder};
pub use middleware::{rewrite_redirect_status, version_guard};
pub use page::{Page, PartialReload};
pub use props::{AmbientProps, Props};
pub use render::{RouteTable, TemplateRenderer};
pub use request::{InertiaRequest, PageContext};
pub use version::fingerprint;
