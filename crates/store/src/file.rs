//! File-backed store: one JSON blob per local user.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::Mutex;
use telemetry::metrics;
use tracing::debug;

use metering_core::{Result, UserRules};

use crate::{StoreConfig, UserRuleStore};

/// Persists the collection as a single JSON file under the configured
/// directory.
pub struct FileStore {
    path: PathBuf,
    /// Guards reads and writes of the blob file itself.
    io_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store at the configured path, creating the directory if
    /// needed.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.directory)?;
        let path = config.blob_path();
        debug!(path = %path.display(), "Opened user-rule store");
        Ok(Self {
            path,
            io_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl UserRuleStore for FileStore {
    fn load(&self) -> Result<UserRules> {
        let _guard = self.io_lock.lock();
        metrics().store_loads.inc();

        match fs::read(&self.path) {
            Ok(bytes) => {
                let rules: UserRules = serde_json::from_slice(&bytes)?;
                debug!(path = %self.path.display(), entries = rules.len(), "Loaded user rules");
                Ok(rules)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(UserRules::new()),
            Err(e) => {
                metrics().store_errors.inc();
                Err(e.into())
            }
        }
    }

    fn save(&self, rules: &UserRules) -> Result<()> {
        let _guard = self.io_lock.lock();

        let bytes = serde_json::to_vec(rules)?;
        if let Err(e) = fs::write(&self.path, bytes) {
            metrics().store_errors.inc();
            return Err(e.into());
        }

        metrics().store_saves.inc();
        debug!(path = %self.path.display(), entries = rules.len(), "Saved user rules");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.io_lock.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                metrics().store_errors.inc();
                return Err(e.into());
            }
        }

        metrics().cache_clears.inc();
        debug!(path = %self.path.display(), "Cleared user rules");
        Ok(())
    }
}
