//! Per-user metering state.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mutable per-user, per-rule metering state, persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRule {
    /// Budget ceiling copied from the rule at creation; never re-synced
    /// if the rule's budget later changes.
    pub budget: u32,

    /// Views counted in the current window.
    pub counter: u32,

    /// Date of the last window reset (or creation).
    pub last_reset_date: NaiveDate,

    /// Content identifiers already counted; membership only.
    pub viewed_pages: HashSet<String>,
}

impl UserRule {
    /// Creates fresh state for a rule first seen on `as_of`.
    pub fn new(budget: u32, as_of: NaiveDate) -> Self {
        Self {
            budget,
            counter: 0,
            last_reset_date: as_of,
            viewed_pages: HashSet::new(),
        }
    }

    /// Whether the counter has reached the ceiling.
    pub fn budget_limit_met(&self) -> bool {
        self.counter >= self.budget
    }

    /// Whether this content was already counted.
    pub fn has_viewed(&self, content_id: &str) -> bool {
        self.viewed_pages.contains(content_id)
    }

    /// Counts a view of new content.
    pub fn record_view(&mut self, content_id: &str) {
        self.counter += 1;
        self.viewed_pages.insert(content_id.to_string());
    }

    /// Starts a new window.
    ///
    /// Only the counter returns to zero; viewed pages and the reset date
    /// carry over, so content counted in an earlier window is never
    /// counted again.
    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }
}

/// All of one user's per-rule state; persisted as a single blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRules {
    rules: HashMap<u32, UserRule>,
}

impl UserRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the state for a rule, creating it lazily on first
    /// evaluation.
    pub fn get_or_create(&mut self, rule_id: u32, budget: u32, as_of: NaiveDate) -> &mut UserRule {
        self.rules
            .entry(rule_id)
            .or_insert_with(|| UserRule::new(budget, as_of))
    }

    pub fn get(&self, rule_id: u32) -> Option<&UserRule> {
        self.rules.get(&rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &UserRule)> {
        self.rules.iter()
    }
}
