//! Engine orchestration across the active rule set.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use telemetry::metrics;
use tracing::{debug, info, warn};

use metering_core::entitlements::Entitlements;
use metering_core::error::{Error, Result};
use metering_core::rules::{validate_rule_set, PaywallRule};
use metering_core::user_rules::UserRule;
use rule_store::{FileStore, UserRuleStore};

use crate::config::EngineConfig;
use crate::evaluator::{evaluate_rule, EvaluationResult, ViewContext};

/// Orchestrates rule evaluation for one user session.
///
/// Holds the active rule set and entitlements supplied by external fetch
/// logic and owns the store transaction boundary. Callers own the
/// engine's lifetime: setters take `&mut self`, while evaluation takes
/// `&self` and serializes its load-modify-save cycle internally.
pub struct PaywallEngine {
    rules: Option<Vec<PaywallRule>>,
    entitlements: Option<Entitlements>,
    access_token: Option<String>,
    store: Arc<dyn UserRuleStore>,
    /// Serializes whole evaluation transactions; concurrent cycles would
    /// otherwise read stale state and drop counter increments.
    store_lock: Mutex<()>,
}

impl PaywallEngine {
    pub fn new(store: Arc<dyn UserRuleStore>) -> Self {
        Self {
            rules: None,
            entitlements: None,
            access_token: None,
            store,
            store_lock: Mutex::new(()),
        }
    }

    /// Builds an engine backed by the configured file store.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let store = FileStore::new(&config.store)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Replaces the active rule set, validating every rule.
    pub fn set_active_rules(&mut self, rules: Vec<PaywallRule>) -> Result<()> {
        validate_rule_set(&rules)?;
        metrics().active_rules.set(rules.len() as u64);
        info!(rules = rules.len(), "Loaded active rule set");
        self.rules = Some(rules);
        Ok(())
    }

    /// Replaces the session's entitlements.
    pub fn set_entitlements(&mut self, entitlements: Option<Entitlements>) {
        self.entitlements = entitlements;
    }

    /// Replaces the session's access token.
    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.access_token = access_token;
    }

    /// The loaded rule set, if any.
    pub fn active_rules(&self) -> Option<&[PaywallRule]> {
        self.rules.as_deref()
    }

    /// Decides whether the user may view `content_id` today (UTC).
    pub fn evaluate(
        &self,
        content_id: &str,
        page_conditions: Option<&HashMap<String, String>>,
        count_toward_budget: bool,
    ) -> Result<()> {
        self.evaluate_at(
            content_id,
            page_conditions,
            count_toward_budget,
            Utc::now().date_naive(),
        )
    }

    /// [`PaywallEngine::evaluate`] with an explicit evaluation date.
    ///
    /// Every rule is evaluated so budget side effects land for each
    /// applicable rule, not just the first offender; the first rule in
    /// load order whose budget is exceeded decides the verdict.
    pub fn evaluate_at(
        &self,
        content_id: &str,
        page_conditions: Option<&HashMap<String, String>>,
        count_toward_budget: bool,
        as_of: NaiveDate,
    ) -> Result<()> {
        let rules = self.rules.as_deref().ok_or(Error::NoActiveRules)?;

        let start = Instant::now();
        metrics().evaluations.inc();

        let view = ViewContext {
            entitlements: self.entitlements.as_ref(),
            access_token: self.access_token.as_deref(),
            content_id,
            page_conditions,
            count_toward_budget,
            as_of,
        };

        let _guard = self.store_lock.lock();
        let mut user_rules = self.store.load()?;
        let mut dirty = false;
        let mut tripped: Option<(u32, UserRule, Option<String>)> = None;

        for rule in rules {
            let (result, mutated) = evaluate_rule(rule, &view, &mut user_rules);
            dirty |= mutated;

            match result {
                EvaluationResult::BudgetExceeded(user_rule) => {
                    if tripped.is_none() {
                        tripped = Some((rule.id, user_rule, rule.campaign_link.clone()));
                    }
                }
                EvaluationResult::EntitlementsMatch
                | EvaluationResult::ConditionsDontMatch
                | EvaluationResult::BudgetNotExceeded(_) => {}
            }
        }

        // One save per call keeps the counter increment and the
        // viewed-page append together: a failed save applies nothing.
        if dirty {
            self.store.save(&user_rules)?;
            metrics().tracked_rules.set(user_rules.len() as u64);
        }

        metrics()
            .evaluation_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        match tripped {
            Some((rule_id, user_rule, campaign_link)) => {
                warn!(
                    rule_id,
                    counter = user_rule.counter,
                    budget = user_rule.budget,
                    "View denied by metering rule"
                );
                Err(Error::RuleTripped {
                    rule_id,
                    user_rule,
                    campaign_link,
                })
            }
            None => {
                debug!(content_id, "View permitted");
                Ok(())
            }
        }
    }

    /// Drops all persisted per-rule state for this user.
    pub fn clear_paywall_cache(&self) -> Result<()> {
        let _guard = self.store_lock.lock();
        self.store.clear()?;
        info!("Cleared paywall cache");
        Ok(())
    }
}
