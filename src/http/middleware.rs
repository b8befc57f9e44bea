//! Middleware units and chain composition.
//!
//! # Responsibilities
//! - Define the single-method `wrap(next) -> handler` capability
//! - Adapt `async fn(Request, Next)` functions into middleware
//! - Compose an ordered middleware list around a handler
//!
//! # Design Decisions
//! - Position 0 in a list runs first at request time (outermost wrapper)
//! - Composition is an explicit fold, last to first
//! - A middleware that never calls `Next::run` halts the chain; its response
//!   is the one the client sees

use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};

use crate::http::handler::Handler;

/// A transform from one handler to another.
pub trait Middleware: Send + Sync + 'static {
    /// Wrap `next`, returning the handler that runs in its place.
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// The remainder of the chain, handed to `from_fn` middleware.
#[derive(Debug, Clone)]
pub struct Next {
    inner: Handler,
}

impl Next {
    /// Invoke the rest of the chain.
    pub async fn run(self, req: Request) -> Response {
        self.inner.call(req).await
    }
}

/// Middleware built from an async function taking the request and [`Next`].
pub struct FromFn<F> {
    f: Arc<F>,
}

/// Create middleware from an async function, in the shape of
/// `axum::middleware::from_fn`.
///
/// ```ignore
/// router.use_middleware(from_fn(|req: Request, next: Next| async move {
///     tracing::info!(path = %req.uri().path(), "incoming");
///     next.run(req).await
/// }));
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    FromFn { f: Arc::new(f) }
}

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn wrap(&self, next: Handler) -> Handler {
        let f = self.f.clone();
        Handler::new(move |req| {
            f(
                req,
                Next {
                    inner: next.clone(),
                },
            )
        })
    }
}

/// Wrap `handler` with every middleware in `middlewares`, index 0 outermost.
pub fn compose(handler: Handler, middlewares: &[Arc<dyn Middleware>]) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, mw| mw.wrap(next))
}
