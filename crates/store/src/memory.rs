//! In-memory store for tests and single-session callers.

use parking_lot::Mutex;

use metering_core::{Result, UserRules};

use crate::UserRuleStore;

/// Keeps the collection in process memory; state dies with the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<UserRules>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRuleStore for MemoryStore {
    fn load(&self) -> Result<UserRules> {
        Ok(self.inner.lock().clone())
    }

    fn save(&self, rules: &UserRules) -> Result<()> {
        *self.inner.lock() = rules.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock() = UserRules::new();
        Ok(())
    }
}
