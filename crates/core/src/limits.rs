//! Field and size limits for backend-supplied paywall data.
//!
//! # Usage Note
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so field limits are duplicated there. Keep both in sync when modifying.

// === Rule Set Limits ===

/// Maximum rules in one active rule set.
pub const MAX_RULES_PER_SET: usize = 100;

/// Budget ceiling upper bound; a rule metering more than this is a
/// backend authoring error.
pub const MAX_PAGE_VIEW_BUDGET: u32 = 10_000;

// === String Field Limits (chars) ===

/// Campaign link max length (matches HTTP Referer header limit).
pub const MAX_CAMPAIGN_LINK_LEN: usize = 2048;

/// Campaign code max length.
pub const MAX_CAMPAIGN_CODE_LEN: usize = 128;

/// Condition key max length (backend keys like "platform" or "countryCode").
pub const MAX_CONDITION_KEY_LEN: usize = 64;

/// Condition value max length.
pub const MAX_CONDITION_VALUE_LEN: usize = 256;

/// Entitlement SKU max length.
pub const MAX_SKU_LEN: usize = 128;

// === Entitlement Limits ===

/// Maximum SKUs a user can hold.
pub const MAX_USER_SKUS: usize = 64;

/// Maximum zones a user can hold.
pub const MAX_USER_ZONES: usize = 64;
