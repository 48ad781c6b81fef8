//! Tracker configuration.
//!
//! Loaded from TOML, with optional environment overrides. Every field has a
//! default, so an empty file (or no file) is a valid configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const ENV_NOTIFICATION_TTL_MS: &str = "TEAMBOARD_NOTIFICATION_TTL_MS";
pub const ENV_CELEBRATION_TTL_MS: &str = "TEAMBOARD_CELEBRATION_TTL_MS";
pub const ENV_SEED: &str = "TEAMBOARD_SEED";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How long a notification stays up unless dismissed.
    pub notification_ttl_ms: u64,

    /// How long the completion celebration stays up.
    pub celebration_ttl_ms: u64,

    /// Pre-populate three members and two tasks.
    pub seed_sample_data: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            notification_ttl_ms: 5000,
            celebration_ttl_ms: 3000,
            seed_sample_data: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `TEAMBOARD_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment, in
    /// production).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_NOTIFICATION_TTL_MS) {
            self.notification_ttl_ms = parse_env(ENV_NOTIFICATION_TTL_MS, value)?;
        }
        if let Some(value) = lookup(ENV_CELEBRATION_TTL_MS) {
            self.celebration_ttl_ms = parse_env(ENV_CELEBRATION_TTL_MS, value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed_sample_data = match value.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::InvalidEnv { var: ENV_SEED, value }),
            };
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "notification_ttl_ms must be greater than 0".into(),
            ));
        }
        if self.celebration_ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "celebration_ttl_ms must be greater than 0".into(),
            ));
        }
        // chrono durations are i64 milliseconds
        if i64::try_from(self.notification_ttl_ms.max(self.celebration_ttl_ms)).is_err() {
            return Err(ConfigError::Invalid("ttl is out of range".into()));
        }
        Ok(())
    }

    pub fn notification_ttl(&self) -> Duration {
        millis(self.notification_ttl_ms)
    }

    pub fn celebration_ttl(&self) -> Duration {
        millis(self.celebration_ttl_ms)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

fn parse_env(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.notification_ttl(), Duration::milliseconds(5000));
        assert_eq!(config.celebration_ttl(), Duration::milliseconds(3000));
    }

    #[test]
    fn toml_overrides_single_fields() {
        let config = TrackerConfig::from_toml_str(
            r#"
            notification_ttl_ms = 8000
            seed_sample_data = false
            "#,
        )
        .unwrap();
        assert_eq!(config.notification_ttl_ms, 8000);
        assert_eq!(config.celebration_ttl_ms, 3000);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = TrackerConfig::from_toml_str("notification_ttl_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CELEBRATION_TTL_MS, "1200"),
            (ENV_SEED, "off"),
        ]);
        let config = TrackerConfig::default()
            .with_overrides(|var| env.get(var).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.celebration_ttl_ms, 1200);
        assert!(!config.seed_sample_data);
        assert_eq!(config.notification_ttl_ms, 5000);
    }

    #[test]
    fn bad_env_value_is_rejected() {
        let err = TrackerConfig::default()
            .with_overrides(|var| (var == ENV_NOTIFICATION_TTL_MS).then(|| "5s".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: ENV_NOTIFICATION_TTL_MS, .. }
        ));
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let config = TrackerConfig {
            notification_ttl_ms: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TrackerConfig::load("/definitely/not/here/teamboard.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
