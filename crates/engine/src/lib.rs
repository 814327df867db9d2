//! Rule evaluation and orchestration for the soft-paywall metering engine.
//!
//! `PaywallEngine` decides, for a session's entitlements and a piece of
//! content, whether a view is permitted and whether it consumes budget.
//! Fetching rules and entitlements stays with the caller; the engine only
//! evaluates what it is given.

pub mod config;
pub mod engine;
pub mod evaluator;

pub use config::EngineConfig;
pub use engine::PaywallEngine;
pub use evaluator::{evaluate_rule, EvaluationResult, ViewContext};
