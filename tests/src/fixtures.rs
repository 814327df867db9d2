//! Test fixtures and rule builders.

use std::collections::HashMap;

use chrono::NaiveDate;
use metering_core::{
    BudgetType, CalendarType, Entitlements, EntitlementValue, PaywallRule, ResetWeekday,
    RollingType, RuleBudget, RuleCondition,
};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Rolling-days budget.
pub fn rolling_budget(days: u32) -> RuleBudget {
    RuleBudget {
        budget_type: BudgetType::Rolling,
        calendar_type: None,
        calendar_weekday: None,
        rolling_type: Some(RollingType::Days),
        rolling_days: Some(days),
    }
}

/// Weekly calendar budget resetting on `weekday`.
pub fn weekly_budget(weekday: ResetWeekday) -> RuleBudget {
    RuleBudget {
        budget_type: BudgetType::Calendar,
        calendar_type: Some(CalendarType::Weekly),
        calendar_weekday: Some(weekday),
        rolling_type: None,
        rolling_days: None,
    }
}

/// Monthly calendar budget.
pub fn monthly_budget() -> RuleBudget {
    RuleBudget {
        budget_type: BudgetType::Calendar,
        calendar_type: Some(CalendarType::Monthly),
        calendar_weekday: None,
        rolling_type: None,
        rolling_days: None,
    }
}

/// A metered rule with no conditions and no entitlement filters.
pub fn metered_rule(id: u32, max_page_views: u32) -> PaywallRule {
    metered_rule_with_budget(id, max_page_views, rolling_budget(30))
}

/// A metered rule with no conditions, no entitlement filters, and the
/// given budget window.
pub fn metered_rule_with_budget(id: u32, max_page_views: u32, budget: RuleBudget) -> PaywallRule {
    PaywallRule {
        id,
        conditions: HashMap::new(),
        budget,
        entitlement_skus: None,
        entitlement_zones: None,
        campaign_link: Some(format!("https://example.com/subscribe?rule={id}")),
        campaign_code: None,
        max_page_views,
    }
}

/// A rule whose `platform` condition must be one of `values`.
pub fn platform_rule(id: u32, max_page_views: u32, values: &[&str]) -> PaywallRule {
    let mut rule = metered_rule(id, max_page_views);
    rule.conditions.insert(
        "platform".to_string(),
        RuleCondition {
            is_in: true,
            values: values.iter().map(|v| v.to_string()).collect(),
        },
    );
    rule
}

/// A rule exempting holders of any of the given SKUs.
pub fn sku_rule(id: u32, max_page_views: u32, skus: &[&str]) -> PaywallRule {
    let mut rule = metered_rule(id, max_page_views);
    rule.entitlement_skus = Some(
        skus.iter()
            .map(|s| EntitlementValue::Str(s.to_string()))
            .collect(),
    );
    rule
}

/// A pure-gate rule: SKU list of exactly `[true]`.
pub fn gate_rule(id: u32, max_page_views: u32) -> PaywallRule {
    let mut rule = metered_rule(id, max_page_views);
    rule.entitlement_skus = Some(vec![EntitlementValue::Bool(true)]);
    rule
}

/// Page conditions carrying only a platform.
pub fn page_conditions(platform: &str) -> HashMap<String, String> {
    HashMap::from([("platform".to_string(), platform.to_string())])
}

/// Entitlements holding the given SKUs.
pub fn entitlements_with_skus(skus: &[&str]) -> Entitlements {
    Entitlements {
        skus: skus.iter().map(|s| s.to_string()).collect(),
        zones: vec![],
        edgescape: None,
    }
}

/// Backend JSON for a two-rule set exercising the heterogeneous
/// entitlement lists.
pub fn rule_set_json() -> &'static str {
    r#"[
        {
            "id": 1,
            "conditions": { "platform": { "isIn": true, "values": ["web"] } },
            "budget": { "budgetType": "rolling", "rollingType": "days", "rollingDays": 30 },
            "entitlementSKUs": ["premium-monthly", "premium-annual"],
            "campaignLink": "https://example.com/subscribe",
            "campaignCode": "meter-web",
            "maxPageViews": 3
        },
        {
            "id": 2,
            "budget": { "budgetType": "calendar", "calendarType": "weekly", "calendarWeekday": "monday" },
            "entitlementSKUs": [true],
            "entitlementZones": [true, 40],
            "maxPageViews": 1
        }
    ]"#
}
