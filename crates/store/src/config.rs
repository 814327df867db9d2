//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File-backed store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory the cache blob lives in.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Cache key; one blob per local user.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
}

fn default_directory() -> String {
    ".paywall-cache".to_string()
}

fn default_cache_key() -> String {
    "user-rules".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            cache_key: default_cache_key(),
        }
    }
}

impl StoreConfig {
    /// Path of the cache blob.
    pub fn blob_path(&self) -> PathBuf {
        Path::new(&self.directory).join(format!("{}.json", self.cache_key))
    }
}
