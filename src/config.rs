//! Configuration loading and constants.
//!
//! The deployment identity (version, color, display name) always comes from the
//! environment so the same image can be started as either side of a blue-green
//! pair. HTTP, database and logging settings come from an optional TOML file and
//! fall back to built-in defaults. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Deployment Environment
// =============================================================================

/// Environment variable holding the deployed version string
pub const ENV_APP_VERSION: &str = "APP_VERSION";

/// Environment variable holding the deployment color
pub const ENV_APP_COLOR: &str = "APP_COLOR";

/// Environment variable holding the human-readable environment name
pub const ENV_APP_NAME: &str = "APP_NAME";

pub const DEFAULT_APP_VERSION: &str = "1.0";
pub const DEFAULT_APP_COLOR: &str = "blue";
pub const DEFAULT_APP_NAME: &str = "Default Environment";

/// The only color value that renders the blue theme; everything else is green.
pub const BLUE_COLOR: &str = "blue";

/// Version that unlocks the gated feature endpoint
pub const FEATURE_GATE_VERSION: &str = "2.0";

// =============================================================================
// Status Page Colors
// =============================================================================

pub const BLUE_BACKGROUND: &str = "#0066cc";
pub const GREEN_BACKGROUND: &str = "#00cc66";
pub const TEXT_COLOR: &str = "#ffffff";

// =============================================================================
// Identity Strings
// =============================================================================

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime identifier reported by `/api/info` and the `server` header
pub const RUNTIME_IDENT: &str = formatcp!("{}/{}", PKG_NAME, PKG_VERSION);

// =============================================================================
// HTTP
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Responses describe the live deployment and must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "database";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "bluegreen_db";
pub const DEFAULT_DB_USER: &str = "admin";
pub const DEFAULT_DB_PASSWORD: &str = "secret123";
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Upper bound on waiting for the connection task after the client is dropped
pub const DB_CLOSE_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "bluegreen=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Deployment identity shown by every endpoint.
///
/// Resolved once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub version: String,
    pub color: String,
    pub name: String,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            version: DEFAULT_APP_VERSION.to_string(),
            color: DEFAULT_APP_COLOR.to_string(),
            name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl Deployment {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup. Missing and empty values
    /// both fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            version: resolve(ENV_APP_VERSION, DEFAULT_APP_VERSION),
            color: resolve(ENV_APP_COLOR, DEFAULT_APP_COLOR),
            name: resolve(ENV_APP_NAME, DEFAULT_APP_NAME),
        }
    }

    pub fn status_color(&self) -> StatusColor {
        StatusColor::from_color(&self.color)
    }

    /// Whether the version-gated feature is switched on
    pub fn has_new_feature(&self) -> bool {
        self.version == FEATURE_GATE_VERSION
    }
}

/// Theme of the status page. Binary: only the exact string "blue" is blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Blue,
    Green,
}

impl StatusColor {
    pub fn from_color(color: &str) -> Self {
        if color == BLUE_COLOR {
            StatusColor::Blue
        } else {
            StatusColor::Green
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            StatusColor::Blue => BLUE_BACKGROUND,
            StatusColor::Green => GREEN_BACKGROUND,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// PostgreSQL connection used by the database probe
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Populated from the environment, never from the file
    #[serde(skip)]
    pub deployment: Deployment,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseConfig::default_dbname")]
    pub dbname: String,
    #[serde(default = "DatabaseConfig::default_user")]
    pub user: String,
    #[serde(default = "DatabaseConfig::default_password")]
    pub password: String,
    /// Connection timeout in seconds (default: 10)
    #[serde(default = "DatabaseConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Refuse to start when the initial connection fails (default: false)
    #[serde(default)]
    pub required: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            dbname: Self::default_dbname(),
            user: Self::default_user(),
            password: Self::default_password(),
            connect_timeout_seconds: Self::default_connect_timeout(),
            required: false,
        }
    }
}

impl DatabaseConfig {
    fn default_host() -> String {
        DEFAULT_DB_HOST.to_string()
    }
    fn default_port() -> u16 {
        DEFAULT_DB_PORT
    }
    fn default_dbname() -> String {
        DEFAULT_DB_NAME.to_string()
    }
    fn default_user() -> String {
        DEFAULT_DB_USER.to_string()
    }
    fn default_password() -> String {
        DEFAULT_DB_PASSWORD.to_string()
    }
    fn default_connect_timeout() -> u64 {
        DEFAULT_DB_CONNECT_TIMEOUT_SECS
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Load settings from a TOML file. The deployment identity is resolved
    /// from the environment afterwards.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&contents)?;
        config.deployment = Deployment::from_env();
        Ok(config)
    }

    /// Built-in defaults with the deployment identity from the environment.
    pub fn from_env() -> Self {
        Self {
            deployment: Deployment::from_env(),
            ..Self::default()
        }
    }

    fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation(
                "http.port must be a non-zero port number".to_string(),
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
