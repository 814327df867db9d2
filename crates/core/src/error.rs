//! Unified error types for the metering engine.

use thiserror::Error;

use crate::user_rules::UserRule;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the metering engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Evaluation was requested before any rule set was loaded.
    ///
    /// Callers decide whether this means "allow" or "block"; the engine
    /// does not.
    #[error("no active rules loaded")]
    NoActiveRules,

    /// A metering rule denied the view.
    ///
    /// Not an engine failure: this is the expected "access denied" signal,
    /// carrying the first offending rule's id, its user-rule snapshot, and
    /// the campaign link for upsell routing.
    #[error("rule {rule_id} tripped")]
    RuleTripped {
        rule_id: u32,
        user_rule: UserRule,
        campaign_link: Option<String>,
    },

    /// A rule in a loaded set failed validation.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Self::InvalidRule(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether this is the expected denial signal rather than a fault.
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::RuleTripped { .. })
    }
}
