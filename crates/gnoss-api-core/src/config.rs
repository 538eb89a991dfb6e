use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GnossApiError, Result};
use crate::http::OAuthCredentials;

const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "https://api.gnoss.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_PACKAGE_SIZE: usize = 1000;

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# gnoss-api configuration file
# Location: ~/.gnoss-api/config.toml

[api]
# Base URL of the GNOSS API service
base_url = "https://api.gnoss.com/"
# Request timeout in seconds
timeout_secs = 30

[oauth]
# Credentials issued by the platform for your application
consumer_key = ""
consumer_secret = ""
token = ""
token_secret = ""

[load]
# Attempts per resource in bulk load/modify/delete
attempts = 5
# Pause between attempts (milliseconds)
retry_delay_ms = 1000
# Triples per massive-load package
package_size = 1000
# Where massive-load packages are buffered
work_dir = "massive-load"

[log]
# trace, debug, info, warn, error
level = "info"
# text, json, compact
format = "text"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub oauth: OAuthCredentials,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bulk and massive load settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_package_size")]
    pub package_size: usize,
    /// Relative paths are resolved against the base directory
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_package_size() -> usize {
    DEFAULT_PACKAGE_SIZE
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("massive-load")
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            package_size: DEFAULT_PACKAGE_SIZE,
            work_dir: default_work_dir(),
        }
    }
}

impl LoadConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Work directory, anchored at `base_dir` when relative
    pub fn work_dir_in(&self, base_dir: &Path) -> PathBuf {
        if self.work_dir.is_absolute() {
            self.work_dir.clone()
        } else {
            base_dir.join(&self.work_dir)
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = GnossApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(GnossApiError::InvalidConfigValue {
                key: "log.format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| GnossApiError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout_secs" => self.api.timeout_secs.to_string(),
            "oauth.consumer_key" => self.oauth.consumer_key.clone(),
            "oauth.consumer_secret" => self.oauth.consumer_secret.clone(),
            "oauth.token" => self.oauth.token.clone(),
            "oauth.token_secret" => self.oauth.token_secret.clone(),
            "load.attempts" => self.load.attempts.to_string(),
            "load.retry_delay_ms" => self.load.retry_delay_ms.to_string(),
            "load.package_size" => self.load.package_size.to_string(),
            "load.work_dir" => self.load.work_dir.display().to_string(),
            "log.level" => self.log.level.clone(),
            "log.format" => self.log.format.as_str().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value).map_err(|_| invalid(key, value))?;
                self.api.base_url = value.to_string();
            }
            "api.timeout_secs" => self.api.timeout_secs = parse_number(key, value)?,
            "oauth.consumer_key" => self.oauth.consumer_key = value.to_string(),
            "oauth.consumer_secret" => self.oauth.consumer_secret = value.to_string(),
            "oauth.token" => self.oauth.token = value.to_string(),
            "oauth.token_secret" => self.oauth.token_secret = value.to_string(),
            "load.attempts" => {
                let attempts: u32 = parse_number(key, value)?;
                if attempts == 0 {
                    return Err(invalid(key, value));
                }
                self.load.attempts = attempts;
            }
            "load.retry_delay_ms" => self.load.retry_delay_ms = parse_number(key, value)?,
            "load.package_size" => {
                let size: usize = parse_number(key, value)?;
                if size == 0 {
                    return Err(invalid(key, value));
                }
                self.load.package_size = size;
            }
            "load.work_dir" => self.load.work_dir = PathBuf::from(value),
            "log.level" => self.log.level = value.to_string(),
            "log.format" => self.log.format = value.parse()?,
            _ => {
                return Err(GnossApiError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values (secrets masked)
    pub fn list(&self) -> Vec<(String, String)> {
        const KEYS: &[&str] = &[
            "api.base_url",
            "api.timeout_secs",
            "oauth.consumer_key",
            "oauth.consumer_secret",
            "oauth.token",
            "oauth.token_secret",
            "load.attempts",
            "load.retry_delay_ms",
            "load.package_size",
            "load.work_dir",
            "log.level",
            "log.format",
        ];

        KEYS.iter()
            .map(|key| {
                let value = self.get(key).unwrap_or_default();
                let value = if key.ends_with("secret") && !value.is_empty() {
                    "********".to_string()
                } else {
                    value
                };
                (key.to_string(), value)
            })
            .collect()
    }
}

fn invalid(key: &str, value: &str) -> GnossApiError {
    GnossApiError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}
