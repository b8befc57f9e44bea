//! Composable routers and mount-tree flattening.
//!
//! # Responsibilities
//! - Store route entries, mounted sub-routers and scoped middleware
//! - Ignore duplicate `(path, method)` routes and duplicate mount prefixes
//! - Flatten the mount tree into fully prefixed, fully composed entries
//!
//! # Design Decisions
//! - `Router` is a shared handle: cloning it or mounting it never copies
//!   state, so later registrations on a child stay visible to its parents
//! - First registration wins; later duplicates are dropped without error
//! - Flattening is a pure read and recomputes everything on each call
//! - Prefixes are joined by plain concatenation; slashes are normalized
//!   only when the dispatch table is built

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::http::handler::IntoHandler;
use crate::http::middleware::{compose, Middleware};
use crate::routing::method::Method;
use crate::routing::route::RouteEntry;

#[derive(Clone)]
struct Mount {
    prefix: String,
    router: Router,
}

#[derive(Default)]
struct RouterState {
    routes: Vec<RouteEntry>,
    mounts: Vec<Mount>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

/// An ordered collection of routes, mounted sub-routers and middleware.
#[derive(Clone, Default)]
pub struct Router {
    inner: Arc<RwLock<RouterState>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
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

    /// Register `handler` for `(path, method)`. A no-op if the pair is
    /// already registered on this router.
    pub fn route(
        &self,
        method: Method,
        path: impl Into<String>,
        handler: impl IntoHandler,
    ) -> &Self {
        let path = path.into();
        let mut state = self.write();
        if state.routes.iter().any(|r| r.same_key(&path, method)) {
            tracing::debug!(method = %method, path = %path, "Duplicate route ignored");
            return self;
        }
        state
            .routes
            .push(RouteEntry::new(path, method, handler.into_handler()));
        self
    }

    /// Append middleware scoped to this router and everything mounted below it.
    pub fn use_middleware(&self, middleware: impl Middleware) -> &Self {
        self.write().middlewares.push(Arc::new(middleware));
        self
    }

    /// Mount `router` under `prefix`. A no-op if `prefix` is already taken.
    ///
    /// The child is stored by reference.
    pub fn mount(&self, prefix: impl Into<String>, router: &Router) -> &Self {
        let prefix = prefix.into();
        let mut state = self.write();
        if state.mounts.iter().any(|m| m.prefix == prefix) {
            tracing::debug!(prefix = %prefix, "Duplicate mount ignored");
            return self;
        }
        state.mounts.push(Mount {
            prefix,
            router: router.clone(),
        });
        self
    }

    /// Flatten this router and everything mounted beneath it.
    ///
    /// Direct routes come first in registration order, followed by each
    /// mount's entries in mount order. Every handler is wrapped by this
    /// router's middleware; mounted entries carry the child's composition
    /// inside it.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let mut ancestors = Vec::new();
        self.flatten(&mut ancestors)
    }

    pub fn route_count(&self) -> usize {
        self.read().routes.len()
    }

    pub fn mount_count(&self) -> usize {
        self.read().mounts.len()
    }

    pub fn middleware_count(&self) -> usize {
        self.read().middlewares.len()
    }

    /// True if both handles point at the same router.
    pub fn ptr_eq(&self, other: &Router) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn flatten(&self, ancestors: &mut Vec<Router>) -> Vec<RouteEntry> {
        // Snapshot under the lock; middleware runs user code and must not
        // be called while it is held.
        let (routes, mounts, middlewares) = {
            let state = self.read();
            (
                state.routes.clone(),
                state.mounts.clone(),
                state.middlewares.clone(),
            )
        };

        let mut flattened = Vec::with_capacity(routes.len());
        for route in routes {
            flattened.push(RouteEntry {
                handler: compose(route.handler, &middlewares),
                ..route
            });
        }

        ancestors.push(self.clone());
        for mount in mounts {
            if ancestors.iter().any(|a| a.ptr_eq(&mount.router)) {
                tracing::warn!(prefix = %mount.prefix, "Cyclic mount skipped");
                continue;
            }
            for child in mount.router.flatten(ancestors) {
                flattened.push(RouteEntry {
                    path: format!("{}{}", mount.prefix, child.path),
                    method: child.method,
                    handler: compose(child.handler, &middlewares),
                });
            }
        }
        ancestors.pop();

        flattened
    }

    fn read(&self) -> RwLockReadGuard<'_, RouterState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RouterState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Router")
            .field("routes", &state.routes.len())
            .field("mounts", &state.mounts.iter().map(|m| &m.prefix).collect::<Vec<_>>())
            .field("middlewares", &state.middlewares.len())
            .finish()
    }
}
