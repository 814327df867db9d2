//! Per-rule evaluation.

use std::collections::HashMap;

use chrono::NaiveDate;
use telemetry::metrics;
use tracing::{debug, trace};

use metering_core::conditions::conditions_met;
use metering_core::entitlements::{exempts, Entitlements};
use metering_core::rules::PaywallRule;
use metering_core::user_rules::{UserRule, UserRules};
use metering_core::window::window_expired;

/// Outcome of evaluating one rule for one content item.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    /// The user's entitlements bypass the rule.
    ///
    /// Reserved for callers that separate bypass from inapplicability;
    /// the evaluator currently reports both as `ConditionsDontMatch`.
    EntitlementsMatch,
    /// The rule does not constrain this view, either because entitlements
    /// bypass it or because its conditions did not match.
    ConditionsDontMatch,
    /// The view is within budget.
    BudgetNotExceeded(UserRule),
    /// The budget ceiling was already reached.
    BudgetExceeded(UserRule),
}

impl EvaluationResult {
    /// Whether the rule denied the view.
    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::BudgetExceeded(_))
    }

    /// Whether the rule constrained the view at all.
    pub fn rule_applied(&self) -> bool {
        matches!(self, Self::BudgetNotExceeded(_) | Self::BudgetExceeded(_))
    }
}

/// One view being evaluated, with the session state it runs under.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub entitlements: Option<&'a Entitlements>,
    pub access_token: Option<&'a str>,
    pub content_id: &'a str,
    pub page_conditions: Option<&'a HashMap<String, String>>,
    pub count_toward_budget: bool,
    pub as_of: NaiveDate,
}

/// Classifies one rule's outcome for one view, mutating `user_rules` in
/// place when the view counts toward the budget.
///
/// Returns the outcome plus whether the collection needs persisting. Only
/// a counted view reports `true`: lazily created entries and window
/// resets are recomputed deterministically on the next evaluation, so
/// they ride along with the next counted save instead of forcing one.
pub fn evaluate_rule(
    rule: &PaywallRule,
    view: &ViewContext<'_>,
    user_rules: &mut UserRules,
) -> (EvaluationResult, bool) {
    metrics().rules_evaluated.inc();

    let geo_conditions = view
        .entitlements
        .and_then(|e| e.edgescape.as_ref())
        .map(|edgescape| edgescape.as_condition_values());

    let exempt = exempts(view.entitlements, view.access_token, rule);
    let applies = !exempt
        && conditions_met(&rule.conditions, geo_conditions.as_ref())
        && conditions_met(&rule.conditions, view.page_conditions);

    if !applies {
        metrics().rules_skipped.inc();
        trace!(rule_id = rule.id, exempt, "Rule does not constrain this view");
        return (EvaluationResult::ConditionsDontMatch, false);
    }

    let user_rule = user_rules.get_or_create(rule.id, rule.max_page_views, view.as_of);

    // A re-view of already-counted content never consumes budget and
    // never touches the window.
    if user_rule.has_viewed(view.content_id) {
        metrics().repeat_views.inc();
        return (EvaluationResult::BudgetNotExceeded(user_rule.clone()), false);
    }

    if window_expired(&rule.budget, user_rule.last_reset_date, view.as_of) {
        user_rule.reset_counter();
        metrics().window_resets.inc();
        debug!(rule_id = rule.id, "Budget window rolled over");
    }

    if user_rule.budget_limit_met() {
        metrics().rules_tripped.inc();
        debug!(
            rule_id = rule.id,
            counter = user_rule.counter,
            budget = user_rule.budget,
            "Budget exceeded"
        );
        return (EvaluationResult::BudgetExceeded(user_rule.clone()), false);
    }

    if view.count_toward_budget {
        user_rule.record_view(view.content_id);
        metrics().views_counted.inc();
        debug!(
            rule_id = rule.id,
            counter = user_rule.counter,
            budget = user_rule.budget,
            "View counted"
        );
        return (EvaluationResult::BudgetNotExceeded(user_rule.clone()), true);
    }

    (EvaluationResult::BudgetNotExceeded(user_rule.clone()), false)
}
