use std::path::PathBuf;

use anyhow::Context;
use axum::http::{header::LOCATION, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{middleware, Router};
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use inertia_axum::logging::init_tracing;
use inertia_axum::{version_guard, Config, Inertia, InertiaError, InertiaRequest, RouteTable};

/// Demo server rendering a couple of Inertia pages.
#[derive(Debug, Parser)]
#[command(name = "inertia-demo", version)]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = Config::FILE_NAME)]
    config: PathBuf,

    /// Override the bind address from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = Config::load_from(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    let bind_addr = config.server.bind_addr.clone();

    let routes = RouteTable::new()
        .route("home", "/", Method::GET)
        .route("users.index", "/users", Method::GET)
        .route("users.update", "/users/{id}", Method::PUT);

    let inertia = Inertia::builder(config).with_routes(routes).build()?;
    inertia.share("appName", "Inertia Demo");
    inertia.share_view_data("title", "Inertia Demo");

    let app = Router::new()
        .route("/", get(home))
        .route("/users", get(users))
        .route("/users/{id}", put(update_user))
        .layer(middleware::from_fn_with_state(inertia, version_guard));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    tracing::info!("Demo server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

async fn home(page: InertiaRequest) -> Result<Response, InertiaError> {
    page.render("Home", ())
}

async fn users(mut page: InertiaRequest) -> Result<Response, InertiaError> {
    let stats = if page.wants_prop("Users/Index", "stats") {
        json!({ "total": 2 })
    } else {
        json!(null)
    };

    page.with_view_data("title", "Users");
    page.render(
        "Users/Index",
        json!({
            "users": [{ "id": 1, "name": "Ada" }, { "id": 2, "name": "Grace" }],
            "stats": stats,
        }),
    )
}

async fn update_user() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/users")]).into_response()
}
