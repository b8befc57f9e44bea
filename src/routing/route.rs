//! Route entries.

use crate::http::handler::Handler;
use crate::routing::method::Method;

/// A single `(path, method, handler)` registration.
///
/// Within one router the `(path, method)` pair is unique; the flattened
/// output of a mount tree carries fully prefixed paths and fully composed
/// handlers in the same shape.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub(crate) path: String,
    pub(crate) method: Method,
    pub(crate) handler: Handler,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, method: Method, handler: Handler) -> Self {
        Self {
            path: path.into(),
            method,
            handler,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// True if this entry answers the same `(path, method)` pair.
    pub fn same_key(&self, path: &str, method: Method) -> bool {
        self.method == method && self.path == path
    }
}
