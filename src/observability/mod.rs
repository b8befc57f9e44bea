//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Setup and dispatch produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters and latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (method, path, pattern)
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
