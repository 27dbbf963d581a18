//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PICKLIST_DATABASE_URL` - `SQLite` archive location
//!   (default: `sqlite:picklist-archive.db?mode=rwc`)

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:picklist-archive.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Archive connection configuration.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// `SQLite` database URL for the archive store.
    pub database_url: String,
}

impl ArchiveConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PICKLIST_DATABASE_URL` is set but not
    /// valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = match std::env::var("PICKLIST_DATABASE_URL") {
            Ok(url) => url,
            Err(std::env::VarError::NotPresent) => DEFAULT_DATABASE_URL.to_string(),
            Err(e) => {
                return Err(ConfigError::InvalidEnvVar(
                    "PICKLIST_DATABASE_URL".to_string(),
                    e.to_string(),
                ));
            }
        };

        Ok(Self { database_url })
    }
}
