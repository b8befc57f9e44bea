//! Exact-match dispatch table.
//!
//! # Responsibilities
//! - Accept fully prefixed, fully composed routes at setup
//! - Resolve requests to a handler and capture named path segments
//! - Answer unmatched requests with 404 (or 405 when only the method differs)
//!
//! # Design Decisions
//! - One `matchit` radix tree per method; O(path-length) lookup
//! - Pattern syntax and collisions are judged by the tree, not pre-checked
//! - Immutable once serving starts; shared behind `Arc` without locks

use std::collections::HashMap;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::handler::Handler;
use crate::observability::metrics;
use crate::routing::method::Method;
use crate::routing::params::PathParams;
use crate::routing::path;

/// Errors raised while building the dispatch table.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The tree rejected a pattern: bad syntax or a collision with an
    /// already registered pattern.
    #[error("cannot register {method} {pattern}: {source}")]
    Register {
        method: Method,
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },
}

/// The registration capability the application configures at setup.
pub trait Multiplexer {
    /// Register an exact-match pattern. `path` is already normalized.
    fn register_pattern(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<(), RoutingError>;
}

/// `matchit`-backed dispatch table.
#[derive(Default)]
pub struct Mux {
    trees: HashMap<Method, matchit::Router<Handler>>,
    len: usize,
}

impl std::fmt::Debug for Mux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mux").field("len", &self.len).finish_non_exhaustive()
    }
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve and run the handler for `req`.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let start = Instant::now();
        let method_label = metric_label(req.method());
        let path = path::normalize(req.uri().path());

        // GET routes also answer HEAD; hyper drops the body on the way out.
        let lookup = if *req.method() == axum::http::Method::HEAD {
            Some(Method::Get)
        } else {
            Method::from_http(req.method())
        };
        let found = lookup
            .and_then(|m| self.trees.get(&m))
            .and_then(|tree| tree.at(&path).ok())
            .map(|matched| (matched.value.clone(), PathParams::from_match(&matched.params)));

        if let Some((handler, params)) = found {
            req.extensions_mut().insert(params);
            let response = handler.call(req).await;
            metrics::record_dispatch(method_label, "matched", start);
            return response;
        }

        let allowed = self.allowed_methods(&path);
        if allowed.is_empty() {
            tracing::debug!(method = %req.method(), path = %path, "No route matched");
            metrics::record_dispatch(method_label, "not_found", start);
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        } else {
            tracing::debug!(method = %req.method(), path = %path, "Method not allowed");
            metrics::record_dispatch(method_label, "method_not_allowed", start);
            method_not_allowed(&allowed)
        }
    }

    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| {
                self.trees
                    .get(m)
                    .is_some_and(|tree| tree.at(path).is_ok())
            })
            .collect()
    }
}

impl Multiplexer for Mux {
    fn register_pattern(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<(), RoutingError> {
        self.trees
            .entry(method)
            .or_insert_with(matchit::Router::new)
            .insert(path, handler)
            .map_err(|source| RoutingError::Register {
                method,
                pattern: path.to_string(),
                source,
            })?;
        self.len += 1;
        tracing::debug!(method = %method, pattern = %path, "Route registered");
        Ok(())
    }
}

/// Metric label for a request method. Unregistrable methods share one
/// label so arbitrary tokens cannot grow the series set.
fn metric_label(method: &axum::http::Method) -> &'static str {
    if *method == axum::http::Method::HEAD {
        return "HEAD";
    }
    Method::from_http(method).map_or("OTHER", |m| m.as_str())
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}
