//! Composable HTTP routing: routers, mounting and scoped middleware on top of
//! an exact-match dispatch table.
//!
//! ```no_run
//! use nest_router::{from_fn, App, Next, PathParamsExt, Router};
//! use axum::extract::Request;
//!
//! # async fn run() -> Result<(), nest_router::ServerError> {
//! let app = App::new();
//! app.use_middleware(from_fn(|req: Request, next: Next| async move {
//!     tracing::info!(path = %req.uri().path(), "incoming");
//!     next.run(req).await
//! }));
//!
//! let users = Router::new();
//! users.get("/{id}", |req: Request| async move {
//!     format!("user {}", req.path_param("id").unwrap_or_default())
//! });
//! app.mount("/users", &users);
//!
//! app.listen("127.0.0.1:8080").await
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{from_fn, App, Handler, IntoHandler, Middleware, Next, ServerError};
pub use lifecycle::Shutdown;
pub use routing::{Method, PathParams, PathParamsExt, RouteEntry, Router, RoutingError};
