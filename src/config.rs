//! Configuration loading and constants.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then the environment variables the hosting platform sets for a function
//! container (`PORT`, `FUNCTION_TARGET`, `FUNCTION_SIGNATURE_TYPE`). Command
//! line flags are applied last by the binary. `AppConfig` is the root struct.

use const_format::formatcp;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;

// =============================================================================
// Platform Environment
// =============================================================================

/// Port the platform expects the container to listen on
pub const ENV_PORT: &str = "PORT";

/// Registered name of the function to serve
pub const ENV_FUNCTION_TARGET: &str = "FUNCTION_TARGET";

/// Function signature type; only HTTP functions are supported
pub const ENV_FUNCTION_SIGNATURE_TYPE: &str = "FUNCTION_SIGNATURE_TYPE";

/// The only accepted signature type
pub const HTTP_SIGNATURE_TYPE: &str = "http";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default bind address (all interfaces, as containers require)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port when `PORT` is not set
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Time allowed for in-flight requests to finish after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

// =============================================================================
// Logging Defaults
// =============================================================================

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "hello_cloud_function=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Help text listing the environment the host reads
pub const ENV_HELP: &str = formatcp!(
    "Environment:\n  {}  listen port (default {})\n  {}  function to serve\n  {}  must be \"{}\"\n  RUST_LOG  log filter (default \"{}\")",
    ENV_PORT,
    DEFAULT_HTTP_PORT,
    ENV_FUNCTION_TARGET,
    ENV_FUNCTION_SIGNATURE_TYPE,
    HTTP_SIGNATURE_TYPE,
    DEFAULT_LOG_FILTER
);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Which registered function to serve and how
    #[serde(default)]
    pub function: FunctionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Graceful shutdown window in seconds
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
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

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// Function selection settings
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    /// Registered function name. When unset, a registry holding exactly one
    /// function serves that one.
    pub target: Option<String>,
    #[serde(default = "FunctionConfig::default_signature_type")]
    pub signature_type: String,
    /// Answer `/favicon.ico` and `/robots.txt` with 404 instead of invoking
    /// the function
    #[serde(default = "FunctionConfig::default_ignore_browser_probes")]
    pub ignore_browser_probes: bool,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            target: None,
            signature_type: Self::default_signature_type(),
            ignore_browser_probes: Self::default_ignore_browser_probes(),
        }
    }
}

impl FunctionConfig {
    fn default_signature_type() -> String {
        HTTP_SIGNATURE_TYPE.to_string()
    }

    fn default_ignore_browser_probes() -> bool {
        true
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

    /// Whether JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply the platform environment variables of the current process.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply platform variables from an arbitrary lookup. Empty values are
    /// treated as unset.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(port) = var(ENV_PORT) {
            self.http.port = port.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(target) = var(ENV_FUNCTION_TARGET) {
            self.function.target = Some(target.trim().to_string());
        }
        if let Some(signature_type) = var(ENV_FUNCTION_SIGNATURE_TYPE) {
            self.function.signature_type = signature_type.trim().to_string();
        }

        Ok(())
    }

    /// Check settings that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self
            .function
            .signature_type
            .eq_ignore_ascii_case(HTTP_SIGNATURE_TYPE)
        {
            return Err(ConfigError::Validation(format!(
                "unsupported function signature type '{}': only '{}' functions can be served",
                self.function.signature_type, HTTP_SIGNATURE_TYPE
            )));
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "unknown logging.format '{}': expected 'text' or 'json'",
                self.logging.format
            )));
        }

        if self.http.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "http.host '{}' is not an IP address",
                self.http.host
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
    #[error("Invalid value for environment variable {name}: '{value}'")]
    Env { name: &'static str, value: String },
    #[error("Configuration error: {0}")]
    Validation(String),
}
