//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client.rs, confirmation.rs
//!     → logging.rs (structured log events to stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Operator terminal / log aggregation
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
