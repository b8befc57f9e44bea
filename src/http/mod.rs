//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve, request ID, timeout, trace layers)
//!     → routing::Mux (exact-match lookup, path parameters)
//!     → middleware.rs chain (global → outer router → inner router)
//!     → handler.rs (user handler produces the response)
//! ```

pub mod handler;
pub mod middleware;
pub mod request;
pub mod server;

pub use handler::{Handler, IntoHandler};
pub use middleware::{compose, from_fn, FromFn, Middleware, Next};
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{App, ServerError};
