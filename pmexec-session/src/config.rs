//! Configuration loading for the PMBOK Exec console.
//!
//! The gateway section is required; `base_url` and `model` default to the
//! public Gemini endpoint and model. The API key is taken from `api_key` or
//! from the environment variable named by `api_key_env`.

use pmexec_llm::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use pmexec_llm::GeminiConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "PMEXEC_CONFIG";

/// Default environment variable holding the Gemini API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pmexec=info,pmexec_session=info,pmexec_llm=info,warn".to_string(),
            json: false,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or PMEXEC_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("API key not configured (set gateway.api_key or ${var})")]
    MissingApiKey { var: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

impl ConsoleConfig {
    /// Load from `--config <path>` or `$PMEXEC_CONFIG`, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args(std::env::args().skip(1)).or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let gateway = &self.gateway;
        if gateway.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("gateway.base_url", "must not be empty"));
        }
        if !gateway.base_url.starts_with("http://") && !gateway.base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "gateway.base_url",
                "must start with http:// or https://",
            ));
        }
        if gateway.model.trim().is_empty() {
            return Err(ConfigError::invalid("gateway.model", "must not be empty"));
        }
        if gateway.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(ConfigError::invalid("gateway.api_key", "must not be empty"));
        }
        if gateway
            .api_key_env
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            return Err(ConfigError::invalid("gateway.api_key_env", "must not be empty"));
        }
        if gateway.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("gateway.request_timeout_ms", "must be > 0"));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::invalid("logging.filter", "must not be empty"));
        }
        Ok(())
    }

    /// Resolve the API key, reading the environment when needed.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_with(|var| std::env::var(var).ok())
    }

    fn api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        if let Some(key) = &self.gateway.api_key {
            return Ok(key.clone());
        }
        let var = self
            .gateway
            .api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        lookup(&var)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey { var })
    }

    /// Provider settings with the resolved key.
    pub fn gemini_config(&self) -> Result<GeminiConfig, ConfigError> {
        Ok(GeminiConfig::new(self.api_key()?)
            .with_base_url(self.gateway.base_url.clone())
            .with_model(self.gateway.model.clone())
            .with_timeout(Duration::from_millis(self.gateway.request_timeout_ms)))
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}
