//! Handler representation.
//!
//! # Responsibilities
//! - Erase the concrete type of user request handlers
//! - Provide a clonable, thread-safe callable for the dispatch table
//!
//! # Design Decisions
//! - Handlers are `Arc`-backed so flattening can wrap them repeatedly
//!   without cloning user state
//! - Any `IntoResponse` output is accepted and converted once, at the edge

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

type HandlerFn = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A type-erased async request handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async function or closure.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self {
            inner: Arc::new(move |req: Request| -> BoxFuture<'static, Response> {
                let fut = f(req);
                Box::pin(async move { fut.await.into_response() })
            }),
        }
    }

    /// Run the handler against a request.
    pub fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        (self.inner)(req)
    }

    /// Returns true if both values share the same underlying callable.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// Conversion into a [`Handler`], accepted by every registration call.
pub trait IntoHandler {
    fn into_handler(self) -> Handler;
}

impl IntoHandler for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

impl<F, Fut, R> IntoHandler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn into_handler(self) -> Handler {
        Handler::new(self)
    }
}
