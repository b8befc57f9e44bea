//! Demo server for the nest-router crate.
//!
//! ```text
//! App  (global: request logging)
//!  ├── GET  /health
//!  ├── /users      → users router (path parameters)
//!  │    ├── GET    /
//!  │    ├── GET    /{id}
//!  │    ├── PUT    /{id}
//!  │    └── DELETE /{id}
//!  └── /admin      → admin router (bearer check, halts on failure)
//!       ├── GET  /status
//!       └── /users → users router again (shared by reference)
//! ```

use std::path::PathBuf;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use clap::Parser;
use serde_json::json;

use nest_router::config::{load_config, ServerConfig};
use nest_router::http::RequestIdExt;
use nest_router::observability::{logging, metrics};
use nest_router::{from_fn, App, Next, PathParamsExt, Router};

#[derive(Parser)]
#[command(name = "nest-router")]
#[command(about = "Demo server for composable routers and scoped middleware", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Bearer token required by the admin router.
    #[arg(long, default_value = "admin-secret-key")]
    admin_key: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("nest-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let app = build_app(config, cli.admin_key);
    app.run().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_app(config: ServerConfig, admin_key: String) -> App {
    let app = App::with_config(config);

    app.use_middleware(from_fn(|req: Request, next: Next| async move {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = req.request_id().unwrap_or("unknown").to_string();
        let res = next.run(req).await;
        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = res.status().as_u16(),
            "Request handled"
        );
        res
    }));

    app.get("/health", |_req: Request| async { Json(json!({ "status": "ok" })) });

    let users = users_router();
    app.mount("/users", &users);

    let admin = Router::new();
    let expected = format!("Bearer {admin_key}");
    admin.use_middleware(from_fn(move |req: Request, next: Next| {
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected);
        async move {
            if authorized {
                next.run(req).await
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
    }));
    admin.get("/status", |_req: Request| async {
        Json(json!({ "version": env!("CARGO_PKG_VERSION"), "status": "operational" }))
    });
    admin.mount("/users", &users);
    app.mount("/admin", &admin);

    app
}

fn users_router() -> Router {
    let users = Router::new();
    users
        .get("/", |_req: Request| async { Json(json!({ "users": [] })) })
        .get("/{id}", |req: Request| async move {
            Json(json!({ "id": req.path_param("id") }))
        })
        .put("/{id}", |req: Request| async move {
            Json(json!({ "updated": req.path_param("id") }))
        })
        .delete("/{id}", |_req: Request| async { StatusCode::NO_CONTENT });
    users
}
