//! Layered store configuration.
//!
//! Precedence (lowest to highest): built-in defaults, TOML file
//! (`~/.flashseed/config.toml` or an explicit path), environment variables,
//! then whatever the caller overrides afterwards (CLI flags).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use tracing::{debug, info};
use url::Url;

use crate::error::{Result, SeedError};
use crate::models::CollectionName;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/flashcards";
pub const DEFAULT_TEARDOWN_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_USER: &str = "FLASHSEED_USER";
pub const ENV_PASSWORD: &str = "FLASHSEED_PASSWORD";
pub const ENV_COLLECTION: &str = "FLASHSEED_COLLECTION";
pub const ENV_TEARDOWN_TIMEOUT: &str = "FLASHSEED_TEARDOWN_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT: &str = "FLASHSEED_CONNECT_TIMEOUT_SECS";

const REDACTED: &str = "********";

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.flashseed/.env
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.flashseed)");
    }
}

/// Get the flashseed config directory path (~/.flashseed)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".flashseed"))
}

/// Get the default config file path (~/.flashseed/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// On-disk config file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: StoreConfig,
}

/// Everything needed to open, use and release one store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Postgres connection string
    pub database_url: String,

    /// Overrides the user in `database_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Overrides the password in `database_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Table holding the flashcards
    pub collection: CollectionName,

    /// Upper bound on connection release
    pub teardown_timeout_secs: u64,

    /// Upper bound on connection setup
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            username: None,
            password: None,
            collection: CollectionName::default(),
            teardown_timeout_secs: DEFAULT_TEARDOWN_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Build the config from defaults, the TOML file and the environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SeedError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            SeedError::config(format!("invalid TOML in {}: {}", path.display(), e))
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(file.store)
    }

    /// Parse the `[store]` table of a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| SeedError::config(format!("invalid TOML: {}", e)))?;
        Ok(file.store)
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.username = Some(user);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(collection) = lookup(ENV_COLLECTION) {
            self.collection = CollectionName::new(&collection)?;
        }
        if let Some(secs) = lookup(ENV_TEARDOWN_TIMEOUT) {
            self.teardown_timeout_secs = parse_secs(ENV_TEARDOWN_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT) {
            self.connect_timeout_secs = parse_secs(ENV_CONNECT_TIMEOUT, &secs)?;
        }
        Ok(())
    }

    pub fn teardown_timeout(&self) -> Duration {
        Duration::from_secs(self.teardown_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Connection options with credential overrides applied.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let mut options = PgConnectOptions::from_str(&self.database_url)
            .map_err(|e| SeedError::config(format!("invalid database url: {}", e)))?;

        if let Some(user) = &self.username {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }

        Ok(options)
    }

    /// `host:port/database` for diagnostics, never including credentials.
    pub fn target(&self) -> String {
        match self.connect_options() {
            Ok(options) => format!(
                "{}:{}/{}",
                options.get_host(),
                options.get_port(),
                options.get_database().unwrap_or_default()
            ),
            Err(_) => "<invalid database url>".to_owned(),
        }
    }

    /// Render the effective config as TOML with secrets removed.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.password = shown.password.map(|_| REDACTED.to_owned());
        shown.database_url = redact_url_password(&shown.database_url);

        toml::to_string_pretty(&ConfigFile { store: shown })
            .map_err(|e| SeedError::config(format!("failed to render config: {}", e)))
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            SeedError::config(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, value
            ))
        })
}

/// Replace every password carried by a connection URL: the userinfo
/// password and `password`/`sslpassword` query parameters. An unparsable URL
/// is replaced entirely.
fn redact_url_password(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "<invalid database url>".to_owned();
    };

    if url.password().is_some() {
        // Only fails for URLs that cannot carry credentials at all
        let _ = url.set_password(Some(REDACTED));
    }

    if url.query_pairs().any(|(key, _)| is_secret_param(&key)) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if is_secret_param(&key) {
                    REDACTED.to_owned()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

fn is_secret_param(key: &str) -> bool {
    matches!(key, "password" | "sslpassword")
}
