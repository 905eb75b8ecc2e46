use crate::error::QuickPactError;
use crate::storage::jenv::{first_non_empty_env_var, get_env_var};
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use tracing::{info, warn};

/*
Configuration Loading (12-Factor App Pattern)
=============================================

Configuration is loaded in the following order, later sources overriding
earlier ones:

1. DEFAULTS: built into the code
2. CONFIG FILE: optional JSON file (path usually taken from QUICKPACT_CONFIG)
3. ENVIRONMENT VARIABLES: always take highest precedence

Environment Variables Supported:
- QUICKPACT_MY_NUMBER (MY_NUMBER is accepted as a legacy alias)
- QUICKPACT_SHARE_BASE_URL
- QUICKPACT_MIN_TERMS_LENGTH
- QUICKPACT_LOG_LEVEL
- QUICKPACT_LOG_DIRECTORY (switches logging to a daily rolling file)

Usage:
```rust,ignore
let config = load_config_12factor_optional(Some("quickpact.config.json"))?;
```
*/

pub const DEFAULT_SHARE_BASE_URL: &str = "https://quickpact.app/agreement/";
pub const DEFAULT_MIN_TERMS_LENGTH: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Getters)]
pub struct Config {
    /// Identity value returned verbatim by the `validate` tool.
    #[getset(get = "pub")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quickpact_my_number: Option<String>,
    #[getset(get = "pub")]
    #[serde(default)]
    quickpact_share_base_url: Option<String>,
    #[getset(get = "pub")]
    #[serde(default)]
    quickpact_min_terms_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builder for [`Config`].
///
/// ```rust
/// use quickpact::config::Config;
///
/// let config = Config::builder()
///     .my_number("919876543210")
///     .min_terms_length(0)
///     .build();
/// assert_eq!(config.my_number().unwrap(), "919876543210");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    my_number: Option<String>,
    share_base_url: Option<String>,
    min_terms_length: Option<usize>,
    observability: Option<ObservabilityConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity value returned by `validate`.
    pub fn my_number(mut self, number: &str) -> Self {
        self.my_number = Some(number.to_string());
        self
    }

    /// Set the base URL shareable agreement links are built from.
    pub fn share_base_url(mut self, url: &str) -> Self {
        self.share_base_url = Some(url.to_string());
        self
    }

    /// Minimum length of agreement terms; 0 disables the check.
    pub fn min_terms_length(mut self, length: usize) -> Self {
        self.min_terms_length = Some(length);
        self
    }

    pub fn observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability = Some(config);
        self
    }

    /// Build the Config. Unset fields take the built-in defaults.
    pub fn build(self) -> Config {
        Config {
            quickpact_my_number: self.my_number,
            quickpact_share_base_url: Some(
                self.share_base_url
                    .unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string()),
            ),
            quickpact_min_terms_length: Some(
                self.min_terms_length.unwrap_or(DEFAULT_MIN_TERMS_LENGTH),
            ),
            observability: self.observability,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Hardcoded defaults, before any file or environment is consulted.
    pub fn with_defaults() -> Self {
        Config {
            quickpact_my_number: None,
            quickpact_share_base_url: Some(DEFAULT_SHARE_BASE_URL.to_string()),
            quickpact_min_terms_length: Some(DEFAULT_MIN_TERMS_LENGTH),
            observability: None,
        }
    }

    /// Read a JSON config file. Missing keys stay `None` so that
    /// [`Config::merge`] only overrides what the file actually sets.
    pub fn from_file(path: &str) -> Result<Config, QuickPactError> {
        let json_str = fs::read_to_string(path).map_err(|e| QuickPactError::ConfigInvalid {
            field: "path".to_string(),
            reason: format!("cannot read config file '{}': {}", path, e),
        })?;
        let config: Config = serde_json::from_str(&json_str)?;
        Ok(config)
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: Config) {
        if other.quickpact_my_number.is_some() {
            self.quickpact_my_number = other.quickpact_my_number;
        }
        if other.quickpact_share_base_url.is_some() {
            self.quickpact_share_base_url = other.quickpact_share_base_url;
        }
        if other.quickpact_min_terms_length.is_some() {
            self.quickpact_min_terms_length = other.quickpact_min_terms_length;
        }
        if other.observability.is_some() {
            self.observability = other.observability;
        }
    }

    /// Apply environment variable overrides. Environment always wins.
    pub fn apply_env_overrides(&mut self) {
        if let Some(number) = first_non_empty_env_var(&["QUICKPACT_MY_NUMBER", "MY_NUMBER"]) {
            self.quickpact_my_number = Some(number);
        }
        if let Some(url) = first_non_empty_env_var(&["QUICKPACT_SHARE_BASE_URL"]) {
            self.quickpact_share_base_url = Some(url);
        }
        if let Some(raw) = first_non_empty_env_var(&["QUICKPACT_MIN_TERMS_LENGTH"]) {
            match raw.parse::<usize>() {
                Ok(length) => self.quickpact_min_terms_length = Some(length),
                Err(e) => warn!(
                    value = %raw,
                    "Ignoring QUICKPACT_MIN_TERMS_LENGTH: {}", e
                ),
            }
        }
        if let Ok(Some(level)) = get_env_var("QUICKPACT_LOG_LEVEL", true) {
            self.observability
                .get_or_insert_with(ObservabilityConfig::default)
                .logs
                .level = level;
        }
        if let Ok(Some(dir)) = get_env_var("QUICKPACT_LOG_DIRECTORY", true) {
            self.observability
                .get_or_insert_with(ObservabilityConfig::default)
                .logs
                .destination = LogDestination::File { path: dir };
        }
    }

    /// The identity value for `validate`, exactly as configured. Fails when it
    /// was never configured or is blank.
    pub fn my_number(&self) -> Result<&str, QuickPactError> {
        self.quickpact_my_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| QuickPactError::ConfigMissing {
                key: "quickpact_my_number".to_string(),
            })
    }

    pub fn min_terms_length(&self) -> usize {
        self.quickpact_min_terms_length
            .unwrap_or(DEFAULT_MIN_TERMS_LENGTH)
    }

    /// Shareable link for an agreement id.
    pub fn share_url(&self, agreement_id: &str) -> String {
        let base = self
            .quickpact_share_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SHARE_BASE_URL);
        if base.ends_with('/') {
            format!("{}{}", base, agreement_id)
        } else {
            format!("{}/{}", base, agreement_id)
        }
    }

    /// Effective log configuration.
    pub fn log_config(&self) -> LogConfig {
        self.observability
            .as_ref()
            .map(|o| o.logs.clone())
            .unwrap_or_default()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // the identity number is never printed
        let number_state = if self.quickpact_my_number.is_some() {
            "set"
        } else {
            "NOT SET"
        };
        write!(
            f,
            "\n    quickpact_my_number:        {}\n    quickpact_share_base_url:   {}\n    quickpact_min_terms_length: {}\n    log level:                  {}\n",
            number_state,
            self.quickpact_share_base_url.as_deref().unwrap_or(""),
            self.min_terms_length(),
            self.log_config().level,
        )
    }
}

/// Load configuration with 12-Factor compliance.
///
/// A config file that is named but cannot be read or parsed is an error.
pub fn load_config_12factor(config_path: Option<&str>) -> Result<Config, QuickPactError> {
    let mut config = Config::with_defaults();

    if let Some(path) = config_path {
        let file_config = Config::from_file(path)?;
        info!("Loaded config file: {}", path);
        config.merge(file_config);
    }

    config.apply_env_overrides();

    info!("Final config (12-Factor):{}", config);
    Ok(config)
}

/// Like [`load_config_12factor`], but a missing or broken config file only
/// produces a warning and the defaults plus environment are used.
pub fn load_config_12factor_optional(config_path: Option<&str>) -> Result<Config, QuickPactError> {
    let mut config = Config::with_defaults();

    if let Some(path) = config_path {
        if std::path::Path::new(path).exists() {
            match Config::from_file(path) {
                Ok(file_config) => {
                    info!("Loaded config file: {}", path);
                    config.merge(file_config);
                }
                Err(e) => {
                    warn!("Failed to parse config file '{}': {}. Using defaults.", path, e);
                }
            }
        } else {
            info!(
                "Config file '{}' not found. Using defaults and environment variables.",
                path
            );
        }
    }

    config.apply_env_overrides();

    info!("Final config (12-Factor):{}", config);
    Ok(config)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logs: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_destination")]
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            destination: LogDestination::Stderr,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_destination() -> LogDestination {
    LogDestination::Stderr
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LogDestination {
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File { path: String },
    #[serde(rename = "null")]
    Null,
}
