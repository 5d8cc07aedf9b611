//! Configuration management

use sentinel_core::{AdvisorConfig, Error, Result, SimulatorConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn default_data_path() -> String {
    "data/servers.json".to_string()
}

fn default_log_capacity() -> usize {
    sentinel_store::action_log::DEFAULT_CAPACITY
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server inventory file
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Maximum number of action log entries kept
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Simulated cleanup settings
    #[serde(default)]
    pub cleanup: SimulatorConfig,

    /// Deletion advisor settings
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            log_capacity: default_log_capacity(),
            cleanup: SimulatorConfig::default(),
            advisor: AdvisorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = if let Some(p) = path {
            Self::load_from_file(p)?
        } else {
            Self::load_from_env()?
        };

        // API key falls back to the environment or a secret file
        if config.advisor.api_key.is_none() {
            config.advisor.api_key = get_secret("ADVISOR_API_KEY");
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from configuration file
    fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse TOML configuration
    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Load from environment variables
    fn load_from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulatorConfig::default();
        let advisor_defaults = AdvisorConfig::default();

        let cleanup = SimulatorConfig {
            latency_ms: parse_var(&lookup, "CLEANUP_LATENCY_MS", defaults.latency_ms)?,
            partial_failure_rate: parse_var(
                &lookup,
                "CLEANUP_PARTIAL_FAILURE_RATE",
                defaults.partial_failure_rate,
            )?,
            offline_address: lookup("CLEANUP_OFFLINE_ADDRESS").unwrap_or(defaults.offline_address),
            rejected_credential: lookup("CLEANUP_REJECTED_CREDENTIAL")
                .unwrap_or(defaults.rejected_credential),
        };

        let advisor = AdvisorConfig {
            api_url: lookup("ADVISOR_API_URL").unwrap_or(advisor_defaults.api_url),
            api_key: None,
            model: lookup("ADVISOR_MODEL").unwrap_or(advisor_defaults.model),
            timeout_secs: parse_var(
                &lookup,
                "ADVISOR_TIMEOUT_SECS",
                advisor_defaults.timeout_secs,
            )?,
        };

        Ok(Config {
            data_path: lookup("SENTINEL_DATA_PATH").unwrap_or_else(default_data_path),
            log_capacity: parse_var(&lookup, "SENTINEL_LOG_CAPACITY", default_log_capacity())?,
            cleanup,
            advisor,
        })
    }

    /// Reject settings the simulator cannot honor
    fn validate(&self) -> Result<()> {
        let rate = self.cleanup.partial_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::ConfigError(format!(
                "partial_failure_rate must be between 0 and 1, got {}",
                rate
            )));
        }
        if self.log_capacity == 0 {
            return Err(Error::ConfigError("log_capacity must be positive".into()));
        }
        if self.advisor.timeout_secs == 0 {
            return Err(Error::ConfigError(
                "advisor timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::ConfigError(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}

/// Get secret from environment variable or file
///
/// Supports both direct environment variables and file-based secrets (Docker/Kubernetes pattern).
/// If `VAR_NAME` is not found, tries `VAR_NAME_FILE` which should point to a file
/// containing the secret.
pub fn get_secret(var_name: &str) -> Option<String> {
    if let Ok(value) = std::env::var(var_name) {
        return Some(value);
    }

    let file_var = format!("{}_FILE", var_name);
    if let Ok(path) = std::env::var(&file_var) {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            return Some(contents.trim().to_string());
        }
    }

    None
}
