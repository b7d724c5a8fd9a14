use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{CandidateOrder, MatchingRules};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// PostgreSQL settings. Without a `url` the service runs on the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_hemoglobin")]
    pub min_hemoglobin: f64,
    #[serde(default = "default_min_hla_hits")]
    pub min_hla_hits: u8,
    #[serde(default)]
    pub order: CandidateOrder,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_hemoglobin: default_min_hemoglobin(),
            min_hla_hits: default_min_hla_hits(),
            order: CandidateOrder::default(),
        }
    }
}

impl MatchingSettings {
    pub fn rules(&self) -> MatchingRules {
        MatchingRules {
            min_hemoglobin: self.min_hemoglobin,
            min_hla_hits: self.min_hla_hits,
            order: self.order,
        }
    }
}

fn default_min_hemoglobin() -> f64 { 12.5 }
fn default_min_hla_hits() -> u8 { 4 }

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    pub relay_endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            relay_endpoint: None,
            api_key: None,
            from_address: default_from_address(),
            timeout_secs: default_notification_timeout(),
        }
    }
}

fn default_from_address() -> String { "alerts@donor-match.local".to_string() }
fn default_notification_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with DONOR_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., DONOR_MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DONOR_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("DONOR_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// The conventional `DATABASE_URL` wins over any configured `database.url`
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching_rules() {
        let rules = MatchingSettings::default().rules();
        assert_eq!(rules.min_hemoglobin, 12.5);
        assert_eq!(rules.min_hla_hits, 4);
        assert_eq!(rules.order, CandidateOrder::Retrieval);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("donor-match-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[matching]
order = "score_descending"
min_hla_hits = 5
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.matching.order, CandidateOrder::ScoreDescending);
        assert_eq!(settings.matching.min_hla_hits, 5);
        assert_eq!(settings.matching.min_hemoglobin, 12.5);
        assert!(!settings.notifications.enabled);
    }
}
