use domain::models::EventConfig;
use persistence::SheetsConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub store: StoreConfig,
    /// Event key -> per-event configuration (display info + backing sheet).
    #[serde(default)]
    pub events: HashMap<String, EventConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-client requests per minute; 0 disables rate limiting.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend: `sheets`, or `memory` for local development.
    #[serde(default = "default_store_provider")]
    pub provider: String,

    /// Sheets API base URL.
    #[serde(default = "default_store_base_url")]
    pub base_url: String,

    /// Bearer token for the sheets backend.
    #[serde(default)]
    pub token: String,

    /// Store request timeout in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,

    /// Event used when a request carries no storeRef.
    #[serde(default)]
    pub default_event: String,
}

impl StoreConfig {
    /// Settings for the sheets backend client.
    pub fn sheets(&self) -> SheetsConfig {
        SheetsConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_store_provider() -> String {
    "sheets".to_string()
}
fn default_store_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}
fn default_store_timeout_ms() -> u64 {
    10000
}

/// Failure to map a request's storeRef to a configured event.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("No default event configured")]
    NoDefault,
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with GL__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GL").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds a config entirely from embedded defaults and overrides, with
    /// no file system dependency.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 0
            request_timeout_secs = 30

            [logging]
            level = "debug"
            format = "pretty"

            [security]
            cors_origins = []
            rate_limit_per_minute = 0

            [store]
            provider = "memory"
            default_event = "opening-night"

            [events.opening-night]
            display_name = "Opening Night"
            banner = "banners/opening-night.jpg"
            guest_list_closes_at = "2026-09-04T20:00:00Z"
            party_starts_at = "2026-09-04T22:00:00Z"
            sheet = "sheet-opening-night"

            [events.closing-party]
            display_name = "Closing Party"
            guest_list_closes_at = "2026-09-18T20:00:00Z"
            party_starts_at = "2026-09-18T23:00:00Z"
            sheet = "sheet-closing-party"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Skip validation to allow partial configs in tests.
        builder.build()?.try_deserialize()
    }

    /// Resolves a request's storeRef to the event backing it.
    ///
    /// An unknown ref is a configuration error, never silently mapped to the
    /// default; the default only applies when no ref was supplied at all.
    pub fn resolve_event(&self, store_ref: Option<&str>) -> Result<&EventConfig, ResolveError> {
        let key = match store_ref {
            Some(key) => key,
            None if self.store.default_event.is_empty() => return Err(ResolveError::NoDefault),
            None => self.store.default_event.as_str(),
        };
        self.events
            .get(key)
            .ok_or_else(|| ResolveError::UnknownEvent(key.to_string()))
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        match self.store.provider.as_str() {
            "memory" => {}
            "sheets" => {
                if self.store.token.is_empty() {
                    return Err(ConfigValidationError::MissingRequired(
                        "GL__STORE__TOKEN environment variable must be set for the sheets provider"
                            .to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown store provider: {}",
                    other
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if !self.store.default_event.is_empty()
            && !self.events.contains_key(&self.store.default_event)
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Default event {} has no [events] entry",
                self.store.default_event
            )));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid socket address")
    }
}
