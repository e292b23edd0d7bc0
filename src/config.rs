use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{DecisionPolicy, TokenizerOptions, DEFAULT_MIN_EXAMPLES, DEFAULT_THRESHOLD_FRACTION};
use crate::services::DEFAULT_MAX_EXAMPLES;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_examples: default_max_examples(),
        }
    }
}

fn default_store_path() -> String { "videos.json".to_string() }
fn default_max_examples() -> usize { DEFAULT_MAX_EXAMPLES }

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default = "default_min_examples")]
    pub min_examples: usize,
    #[serde(default = "default_threshold_fraction")]
    pub threshold_fraction: f64,
    #[serde(default = "default_stem")]
    pub stem: bool,
    #[serde(default)]
    pub drop_stop_words: bool,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            min_examples: default_min_examples(),
            threshold_fraction: default_threshold_fraction(),
            stem: default_stem(),
            drop_stop_words: false,
        }
    }
}

impl ClassifierSettings {
    pub fn policy(&self) -> DecisionPolicy {
        DecisionPolicy::new(self.min_examples, self.threshold_fraction)
    }

    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            stem: self.stem,
            drop_stop_words: self.drop_stop_words,
        }
    }
}

fn default_min_examples() -> usize { DEFAULT_MIN_EXAMPLES }
fn default_threshold_fraction() -> f64 { DEFAULT_THRESHOLD_FRACTION }
fn default_stem() -> bool { true }

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
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with REC_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., REC__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("REC")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classifier() {
        let classifier = ClassifierSettings::default();
        assert_eq!(classifier.min_examples, 10);
        assert_eq!(classifier.threshold_fraction, 0.4);
        assert!(classifier.stem);
        assert!(!classifier.drop_stop_words);
        assert_eq!(classifier.policy(), DecisionPolicy::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [store]
            path = "/var/lib/rec/videos.json"

            [classifier]
            threshold_fraction = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(settings.store.path, "/var/lib/rec/videos.json");
        assert_eq!(settings.store.max_examples, 1_000_000);
        assert_eq!(settings.classifier.threshold_fraction, 0.5);
        assert_eq!(settings.classifier.min_examples, 10);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\nport = 8080\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, "info");
    }
}
