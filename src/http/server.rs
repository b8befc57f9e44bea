//! Application setup and serving.
//!
//! # Responsibilities
//! - Own the root router and the global middleware list
//! - Flatten the mount tree and register every entry, exactly once
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Setup consumes the `App`; the route tree is frozen from then on
//! - No rollback: a failed registration leaves earlier patterns in place
//!   and aborts startup
//! - Bind errors propagate unchanged, no retry

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    response::Response,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handler::IntoHandler;
use crate::http::middleware::Middleware;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;
use crate::routing::{path, Method, Multiplexer, Mux, RouteEntry, Router, RoutingError};

/// Errors that stop an application from serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("route setup failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// The root of a routed HTTP application.
///
/// Structurally a root [`Router`] whose middleware is global, plus the
/// configuration used when serving.
#[derive(Debug, Default)]
pub struct App {
    root: Router,
    config: ServerConfig,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            root: Router::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn get(&self, path: impl Into<String>, handler: impl IntoHandler) -> &Self {
        self.route(Method::Get, path, handler)
    }

    pub fn post(&self, path: impl Into<String>, handler: impl IntoHandler) -> &Self {
        self.route(Method::Post, path, handler)
    }

    pub fn put(&self, path: impl Into<String>, handler: impl IntoHandler) -> &Self {
        self.route(Method::Put, path, handler)
    }

    pub fn delete(&self, path: impl Into<String>, handler: impl IntoHandler) -> &Self {
        self.route(Method::Delete, path, handler)
    }

    pub fn route(
        &self,
        method: Method,
        path: impl Into<String>,
        handler: impl IntoHandler,
    ) -> &Self {
        self.root.route(method, path, handler);
        self
    }

    /// Add global middleware; it wraps every route, mounted ones included.
    pub fn use_middleware(&self, middleware: impl Middleware) -> &Self {
        self.root.use_middleware(middleware);
        self
    }

    pub fn mount(&self, prefix: impl Into<String>, router: &Router) -> &Self {
        self.root.mount(prefix, router);
        self
    }

    /// Flattened view of every route, global middleware outermost.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.root.routes()
    }

    /// Flatten the tree and register each entry with `mux`.
    ///
    /// Returns the number of patterns registered. Stops at the first
    /// rejected pattern; entries registered before it stay registered.
    pub fn register_routes<M: Multiplexer>(&self, mux: &mut M) -> Result<usize, RoutingError> {
        let routes = self.routes();
        let count = routes.len();
        for route in routes {
            let pattern = path::normalize(&route.path);
            mux.register_pattern(route.method, &pattern, route.handler)?;
        }
        Ok(count)
    }

    /// Build the dispatch table for this application.
    pub fn build_mux(&self) -> Result<Mux, RoutingError> {
        let mut mux = Mux::new();
        let count = self.register_routes(&mut mux)?;
        metrics::record_registered(count);
        tracing::info!(routes = count, "Routes registered");
        Ok(mux)
    }

    /// Run setup and return the servable Axum router.
    pub fn into_router(self) -> Result<axum::Router, RoutingError> {
        let mux = Arc::new(self.build_mux()?);
        Ok(Self::build_router(&self.config, mux))
    }

    /// Run setup, bind the configured address, serve until Ctrl+C/SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let address = self.config.listener.bind_address.clone();
        self.listen(&address).await
    }

    /// Run setup, bind `address`, serve until Ctrl+C/SIGTERM.
    pub async fn listen(self, address: &str) -> Result<(), ServerError> {
        let router = self.into_router()?;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;
        serve_router(listener, router, shutdown_signal()).await
    }

    /// Run setup and serve on an already bound listener until `shutdown`
    /// resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.into_router()?;
        serve_router(listener, router, shutdown).await
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, mux: Arc<Mux>) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch)
            .with_state(mux)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }
}

async fn dispatch(State(mux): State<Arc<Mux>>, request: Request) -> Response {
    mux.dispatch(request).await
}

async fn serve_router<F>(
    listener: TcpListener,
    router: axum::Router,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    let app = router.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
