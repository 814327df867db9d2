//! Backend paywall rule definitions and decoding.
//!
//! Rules arrive as backend JSON once per session and stay immutable for
//! the session's lifetime. Decoding is the only serialization surface this
//! core owns; fetching is the caller's concern.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};
use crate::limits::{MAX_CONDITION_KEY_LEN, MAX_CONDITION_VALUE_LEN, MAX_RULES_PER_SET};

/// A single element of a rule's entitlement list.
///
/// The backend rule language mixes a boolean "any entitled user bypasses"
/// flag with concrete identifier lists in the same array, so elements are
/// decoded by runtime type. Variant order is load-bearing: serde tries
/// untagged variants in declaration order, which must stay bool, then
/// string, then int.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntitlementValue {
    Bool(bool),
    Str(String),
    Int(i64),
}

impl EntitlementValue {
    /// Whether this is the boolean sentinel `true`.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

/// An in/out membership condition over observed string values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    /// `true` requires the observed value to be in `values`; `false`
    /// requires it to be absent.
    pub is_in: bool,
    pub values: Vec<String>,
}

/// Budget window family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Calendar,
    Rolling,
}

/// Calendar window granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Weekly,
    Monthly,
}

/// Rolling window unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingType {
    Days,
    /// Accepted from the backend but never triggers a reset.
    Hours,
}

/// Weekday a weekly budget resets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetWeekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl ResetWeekday {
    /// 1 (Sunday) through 7 (Saturday), the numbering the weekly reset
    /// arithmetic is defined in.
    pub fn ordinal(&self) -> i64 {
        match self {
            Self::Sunday => 1,
            Self::Monday => 2,
            Self::Tuesday => 3,
            Self::Wednesday => 4,
            Self::Thursday => 5,
            Self::Friday => 6,
            Self::Saturday => 7,
        }
    }
}

/// Budget window configuration for one rule.
///
/// Only the fields matching `budget_type` are meaningful; the rest decode
/// as `None` and an incomplete combination never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBudget {
    pub budget_type: BudgetType,
    pub calendar_type: Option<CalendarType>,
    pub calendar_weekday: Option<ResetWeekday>,
    pub rolling_type: Option<RollingType>,
    pub rolling_days: Option<u32>,
}

/// An immutable metering rule published by the backend for one session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaywallRule {
    /// Unique within one rule set.
    pub id: u32,

    /// Condition key to membership condition, matched against both the
    /// caller's page conditions and the flattened geo attributes.
    #[serde(default)]
    #[validate(custom(function = "validate_conditions"))]
    pub conditions: HashMap<String, RuleCondition>,

    pub budget: RuleBudget,

    /// Heterogeneous SKU entitlement list (sentinel and/or SKU strings).
    #[serde(rename = "entitlementSKUs")]
    pub entitlement_skus: Option<Vec<EntitlementValue>>,

    /// Heterogeneous zone entitlement list (sentinel and/or zone ints).
    pub entitlement_zones: Option<Vec<EntitlementValue>>,

    /// Upsell URL surfaced when this rule trips; passed through untouched.
    #[validate(length(max = 2048))]
    pub campaign_link: Option<String>,

    /// Opaque campaign identifier; passed through untouched.
    #[validate(length(max = 128))]
    pub campaign_code: Option<String>,

    /// Distinct content items a non-exempt user may view per window.
    #[validate(range(max = 10_000))]
    pub max_page_views: u32,
}

/// Validates condition keys and values against the field limits.
fn validate_conditions(
    conditions: &HashMap<String, RuleCondition>,
) -> std::result::Result<(), ValidationError> {
    for (key, condition) in conditions {
        if key.is_empty() || key.len() > MAX_CONDITION_KEY_LEN {
            let mut err = ValidationError::new("condition_key_length");
            err.message = Some(
                format!("condition key must be 1-{MAX_CONDITION_KEY_LEN} chars").into(),
            );
            return Err(err);
        }
        if condition
            .values
            .iter()
            .any(|v| v.len() > MAX_CONDITION_VALUE_LEN)
        {
            let mut err = ValidationError::new("condition_value_length");
            err.message = Some(
                format!(
                    "condition '{key}' has a value over {MAX_CONDITION_VALUE_LEN} chars"
                )
                .into(),
            );
            return Err(err);
        }
    }
    Ok(())
}

/// Parses and validates an active rule set from backend JSON.
pub fn parse_rule_set(json: &str) -> Result<Vec<PaywallRule>> {
    let rules: Vec<PaywallRule> = serde_json::from_str(json)?;
    validate_rule_set(&rules)?;
    Ok(rules)
}

/// Validates an already-decoded rule set.
///
/// Rejects the whole set on the first invalid rule or duplicate id.
pub fn validate_rule_set(rules: &[PaywallRule]) -> Result<()> {
    if rules.len() > MAX_RULES_PER_SET {
        return Err(Error::invalid_rule(format!(
            "rule set has {} rules, exceeds {} limit",
            rules.len(),
            MAX_RULES_PER_SET
        )));
    }

    let mut seen = HashSet::new();
    for rule in rules {
        rule.validate()
            .map_err(|e| Error::invalid_rule(format!("rule {}: {}", rule.id, e)))?;
        if !seen.insert(rule.id) {
            return Err(Error::invalid_rule(format!("duplicate rule id {}", rule.id)));
        }
    }
    Ok(())
}
