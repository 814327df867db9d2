//! User entitlements and the exemption decision.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::rules::{EntitlementValue, PaywallRule};

/// Geo attributes attached to the session by the CDN.
///
/// Absent attributes are omitted rather than null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edgescape {
    pub city: Option<String>,
    pub continent: Option<String>,
    pub region: Option<String>,
    pub dma: Option<String>,
    pub country_code: Option<String>,
}

impl Edgescape {
    /// Flattens present attributes into condition-matcher input.
    pub fn as_condition_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        if let Some(city) = &self.city {
            values.insert("city".to_string(), city.clone());
        }
        if let Some(continent) = &self.continent {
            values.insert("continent".to_string(), continent.clone());
        }
        if let Some(region) = &self.region {
            values.insert("region".to_string(), region.clone());
        }
        if let Some(dma) = &self.dma {
            values.insert("dma".to_string(), dma.clone());
        }
        if let Some(country_code) = &self.country_code {
            values.insert("countryCode".to_string(), country_code.clone());
        }
        values
    }
}

/// A user's paid/registered access proofs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Entitlements {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub skus: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub zones: Vec<i64>,

    pub edgescape: Option<Edgescape>,
}

/// Parses and validates entitlements from backend JSON.
pub fn parse_entitlements(json: &str) -> Result<Entitlements> {
    let entitlements: Entitlements = serde_json::from_str(json)?;
    entitlements
        .validate()
        .map_err(|e| Error::invalid_rule(format!("entitlements: {}", e)))?;
    Ok(entitlements)
}

/// Decides whether a user's entitlements exempt them from a rule entirely.
///
/// Absent entitlement data never meters: without knowing what the user
/// holds, every rule is skipped. The SKU check runs before the zone
/// check, and the first match wins.
pub fn exempts(
    entitlements: Option<&Entitlements>,
    access_token: Option<&str>,
    rule: &PaywallRule,
) -> bool {
    let Some(entitlements) = entitlements else {
        return true;
    };

    if let Some(skus) = rule.entitlement_skus.as_deref() {
        if sku_exempt(skus, &entitlements.skus, access_token) {
            return true;
        }
    }

    if let Some(zones) = rule.entitlement_zones.as_deref() {
        if zone_exempt(zones, &entitlements.zones) {
            return true;
        }
    }

    false
}

/// SKU check: a list of exactly `[true]` gates on authentication alone
/// (unauthenticated users bypass); anything else matches concrete SKUs.
fn sku_exempt(
    rule_skus: &[EntitlementValue],
    user_skus: &[String],
    access_token: Option<&str>,
) -> bool {
    if let [EntitlementValue::Bool(true)] = rule_skus {
        return access_token.is_none();
    }

    rule_skus.iter().any(|value| match value {
        EntitlementValue::Str(sku) => user_skus.iter().any(|held| held == sku),
        _ => false,
    })
}

/// Zone check: the sentinel and a matching zone must co-occur in the list.
fn zone_exempt(rule_zones: &[EntitlementValue], user_zones: &[i64]) -> bool {
    let has_sentinel = rule_zones.iter().any(EntitlementValue::is_sentinel);
    has_sentinel
        && rule_zones.iter().any(|value| match value {
            EntitlementValue::Int(zone) => user_zones.contains(zone),
            _ => false,
        })
}
