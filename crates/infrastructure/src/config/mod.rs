//! Agent configuration: structs, parsing, and validation.
//!
//! Configuration is a single YAML file; every section is optional and
//! falls back to defaults, so the agent also runs with no file at all
//! (credentials then come from the environment).

mod common;
mod notifications;
mod sources;

pub use common::ConfigError;
pub use notifications::NotificationsConfig;
pub use sources::{
    GithubSourceConfig, MispSourceConfig, NvdSourceConfig, OtxSourceConfig, RedHatSourceConfig,
    SourcesConfig, StubSourceConfig, SyndicationFeedConfig, SyndicationSourceConfig,
    ThreatFoxSourceConfig,
};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use common::warn_if_world_readable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between ingestion cycles. The agent floors this at 60.
    pub fetch_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_interval_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the embedded alert database.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("alerts.redb"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    pub storage: StorageConfig,
    pub sources: SourcesConfig,
    pub notifications: NotificationsConfig,
}

impl AgentConfig {
    /// Load the config file if it exists, otherwise start from
    /// defaults. Environment credentials are applied and the result is
    /// validated either way.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                warn_if_world_readable(path, "config file");
                let raw = std::fs::read_to_string(path)?;
                serde_yaml_ng::from_str(&raw)?
            }
            Some(path) => {
                tracing::info!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|var| std::env::var(var).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String> + Copy) {
        self.sources.apply_env(lookup);
        self.notifications.apply_env(lookup);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.fetch_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "scheduler.fetch_interval_secs".to_string(),
                message: "interval must be > 0".to_string(),
            });
        }
        self.sources.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler.fetch_interval_secs, 3600);
        assert_eq!(config.storage.path, PathBuf::from("alerts.redb"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = AgentConfig::default();
        config.scheduler.fetch_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            AgentConfig::load_or_default(Some(Path::new("/nonexistent/intelwatch.yaml"))).unwrap();
        assert!(config.sources.github.enabled);
    }

    #[test]
    fn yaml_file_overrides_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "scheduler:\n  fetch_interval_secs: 900\nlogging:\n  level: debug\n  format: json\nnotifications:\n  threshold: Critical\n"
        )
        .unwrap();

        let config = AgentConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.scheduler.fetch_interval_secs, 900);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.notifications.threshold_severity(),
            domain::common::entity::Severity::Critical
        );
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "scheduler: [not, a, map").unwrap();
        let result = AgentConfig::load_or_default(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn invalid_threshold_fails_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "notifications:\n  threshold: Severe\n").unwrap();
        let result = AgentConfig::load_or_default(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
