//! Cart store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_BACKEND` - `memory`, `file` or `postgres` (default: file)
//! - `CART_STORAGE_KEY` - Key the cart blob is stored under (default: `@GoMarketplace:cart`)
//! - `CART_STORAGE_DIR` - Directory for the `file` backend (default: .go-marketplace)
//!
//! ## Required for the `postgres` backend
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::storage::STORAGE_KEY;

const DEFAULT_STORAGE_DIR: &str = ".go-marketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which key-value store backs the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    Memory,
    #[default]
    File,
    Postgres,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!(
                "unknown backend '{other}' (expected memory, file or postgres)"
            )),
        }
    }
}

/// Storage backend settings.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-process map, lost on exit.
    Memory,
    /// One JSON file per key under `dir`.
    File { dir: PathBuf },
    /// `cart_storage` table in `PostgreSQL`.
    Postgres { database_url: SecretString },
}

impl StorageConfig {
    /// The backend kind this configuration selects.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Memory => BackendKind::Memory,
            Self::File { .. } => BackendKind::File,
            Self::Postgres { .. } => BackendKind::Postgres,
        }
    }
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Backend settings
    pub storage: StorageConfig,
}

/// Default key with in-memory storage. `from_env` defaults to the file backend instead.
impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            storage: StorageConfig::Memory,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the `postgres`
    /// backend is selected without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`CartConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let backend = env
            .or_default("CART_STORAGE_BACKEND", "file")
            .parse::<BackendKind>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_STORAGE_BACKEND".to_string(), e))?;
        let storage_key = env.or_default("CART_STORAGE_KEY", STORAGE_KEY);
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage = match backend {
            BackendKind::Memory => StorageConfig::Memory,
            BackendKind::File => StorageConfig::File {
                dir: PathBuf::from(env.or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            },
            BackendKind::Postgres => StorageConfig::Postgres {
                database_url: env.database_url("CART_DATABASE_URL")?,
            },
        };

        Ok(Self {
            storage_key,
            storage,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        (self.0)(primary_key)
            .or_else(|| (self.0)("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}
