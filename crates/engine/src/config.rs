//! Engine configuration loading.

use serde::{Deserialize, Serialize};

use metering_core::error::{Error, Result};
use rule_store::StoreConfig;

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

impl EngineConfig {
    /// Loads configuration from files and environment.
    ///
    /// Layering: compiled defaults, then an optional
    /// `config/default.toml`, then `PAYWALL`-prefixed environment
    /// variables (`PAYWALL_STORE__DIRECTORY`, `PAYWALL_STORE__CACHE_KEY`).
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Config::try_from(&Self::default())
                    .map_err(|e| Error::config(e.to_string()))?,
            )
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .prefix("PAYWALL")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(e.to_string()))
    }
}
