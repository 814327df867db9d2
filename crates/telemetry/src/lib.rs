//! Internal telemetry for the paywall metering engine.
//!
//! Evaluation is local computation, so metrics stay in-memory: atomic
//! counters and a latency histogram with an on-demand snapshot for
//! callers that want to ship them elsewhere.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
