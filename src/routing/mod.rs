//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (before setup):
//!     get/post/put/delete → router.rs (route entries, first wins)
//!     mount(prefix, router) → router.rs (shared child handle, first wins)
//!     use_middleware(mw) → router.rs (scoped middleware list)
//!
//! Setup (once):
//!     router.rs flatten (prefix concat + middleware composition)
//!     → path.rs (trailing slash normalization)
//!     → mux.rs (one radix tree per method)
//!
//! Dispatch:
//!     request path → path.rs → mux.rs lookup
//!     → params.rs (named segments into request extensions)
//!     → composed handler, or 404 / 405
//! ```
//!
//! # Design Decisions
//! - Mount tree is read live at setup; nothing is snapshotted earlier
//! - Only direct siblings are deduplicated; collisions across the flattened
//!   tree are left to the dispatch table
//! - Dispatch table is immutable at runtime (thread-safe without locks)

pub mod method;
pub mod mux;
pub mod params;
pub mod path;
pub mod route;
pub mod router;

pub use method::Method;
pub use mux::{Multiplexer, Mux, RoutingError};
pub use params::{PathParams, PathParamsExt};
pub use route::RouteEntry;
pub use router::Router;
