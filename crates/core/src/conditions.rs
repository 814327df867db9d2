//! Rule condition matching.
//!
//! Conditions form a small in/out DSL over observed string values. A
//! rule's condition map is matched against two observed maps per
//! evaluation: the caller-supplied page conditions and the flattened geo
//! attributes.

use std::collections::HashMap;

use crate::rules::RuleCondition;

/// Whether a single condition is met by an observed value.
pub fn condition_met(condition: &RuleCondition, observed: &str) -> bool {
    condition.is_in == condition.values.iter().any(|v| v == observed)
}

/// Aggregate match of a rule's conditions against an observed map.
///
/// Keys absent from the observed map are skipped (automatically
/// satisfied), and an absent map satisfies everything: only an observed
/// value can fail a condition.
pub fn conditions_met(
    conditions: &HashMap<String, RuleCondition>,
    observed: Option<&HashMap<String, String>>,
) -> bool {
    let Some(observed) = observed else {
        return true;
    };

    conditions
        .iter()
        .filter_map(|(key, condition)| observed.get(key).map(|value| (condition, value)))
        .all(|(condition, value)| condition_met(condition, value.as_str()))
}
