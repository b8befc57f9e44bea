//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (http/server.rs):
//!     Flatten routes → Register patterns → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     trigger() → graceful shutdown future resolves → drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: setup and bind errors are fatal, no retry
//! - Listener starts last (traffic only once routes are registered)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
