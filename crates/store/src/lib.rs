//! Persisted per-user rule state for the paywall metering engine.

pub mod config;
pub mod file;
pub mod memory;

use metering_core::{Result, UserRules};

pub use config::StoreConfig;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Persistence contract for one user's rule state.
///
/// `load` and `save` move the whole collection as a single blob. Callers
/// that read-modify-write must serialize those cycles through one mutual
/// exclusion boundary (the engine holds that lock); implementations only
/// guarantee that each individual operation is atomic.
pub trait UserRuleStore: Send + Sync {
    /// Loads the persisted collection, empty if nothing was saved yet.
    fn load(&self) -> Result<UserRules>;

    /// Replaces the persisted collection.
    fn save(&self, rules: &UserRules) -> Result<()>;

    /// Removes all persisted state.
    fn clear(&self) -> Result<()>;
}
