/// Service configuration loader - parses aquamonitor.toml
///
/// Keeps deployment details (backend URL, refresh cadence, endpoint port)
/// out of the code. Every field has a default, so a missing file is not an
/// error. The backend URL and API token can be overridden from the
/// environment or a `.env` file:
///
///   AQUAMONITOR_API_URL    overrides `[api] base_url`
///   AQUAMONITOR_API_TOKEN  bearer token for backend requests (no file key)

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::view_model::DerivationOptions;

pub const DEFAULT_CONFIG_PATH: &str = "aquamonitor.toml";
pub const ENV_API_URL: &str = "AQUAMONITOR_API_URL";
pub const ENV_API_TOKEN: &str = "AQUAMONITOR_API_TOKEN";

/// Upper bound for `dashboard.refresh_interval_secs`: one week.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub endpoint: EndpointConfig,
    /// Only ever set from the environment.
    #[serde(skip)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// How long a derived snapshot is served before it is rebuilt.
    pub refresh_interval_secs: u64,
    /// Collapse duplicate historical dates before counting history.
    pub dedupe_historical_dates: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
            dedupe_historical_dates: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Snapshot lifetime. Values above `MAX_REFRESH_INTERVAL_SECS` are
    /// rejected by validation and capped here.
    pub fn refresh_interval(&self) -> chrono::Duration {
        let secs = self.dashboard.refresh_interval_secs.min(MAX_REFRESH_INTERVAL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn derivation_options(&self) -> DerivationOptions {
        DerivationOptions {
            dedupe_historical_dates: self.dashboard.dedupe_historical_dates,
        }
    }

    /// Applies `AQUAMONITOR_API_URL` / `AQUAMONITOR_API_TOKEN` overrides.
    /// `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        let interval = self.dashboard.refresh_interval_secs;
        if interval == 0 || interval > MAX_REFRESH_INTERVAL_SECS {
            return Err(ConfigError::Invalid(format!(
                "dashboard.refresh_interval_secs must be between 1 and {}, got {}",
                MAX_REFRESH_INTERVAL_SECS, interval
            )));
        }
        Ok(self)
    }
}

/// Parses configuration text. Does not consult the environment.
pub fn parse_config(contents: &str, path: &str) -> Result<Config, ConfigError> {
    parse_config_with_env(contents, path, |_| None)
}

/// Parses configuration text, applies overrides from `lookup`, then
/// validates the result.
pub fn parse_config_with_env<F>(contents: &str, path: &str, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    config.apply_env(lookup);
    config.validate()
}

/// Loads configuration from `path` (defaults if the file does not exist),
/// then applies `.env` and environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();

    let path = path.as_ref();
    let shown = path.display().to_string();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => return Err(ConfigError::Read { path: shown, source }),
    };

    parse_config_with_env(&contents, &shown, |key| std::env::var(key).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
