// Configuration module for javagraph
// Reads from environment variables with sensible defaults

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Source file extension to analyze (JAVAGRAPH_EXTENSION)
    pub extension: String,

    /// Files larger than this are skipped (JAVAGRAPH_MAX_FILE_SIZE_MB)
    pub max_file_size_mb: u64,

    /// Smell thresholds
    pub thresholds: SmellThresholds,

    /// Number of method clusters in reports (JAVAGRAPH_CLUSTERS)
    pub clusters: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmellThresholds {
    /// JAVAGRAPH_MAX_METHODS
    pub max_methods: usize,
    /// JAVAGRAPH_MAX_FIELDS
    pub max_fields: usize,
    /// JAVAGRAPH_MAX_METHOD_LINES
    pub max_method_lines: usize,
    /// JAVAGRAPH_ENVY_MIN_CALLS
    pub envy_min_calls: usize,
    /// JAVAGRAPH_ENVY_RATIO
    pub envy_ratio: f64,
}

impl Default for SmellThresholds {
    fn default() -> Self {
        Self {
            max_methods: 20,
            max_fields: 15,
            max_method_lines: 50,
            envy_min_calls: 3,
            envy_ratio: 1.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: "java".to_string(),
            max_file_size_mb: 10,
            thresholds: SmellThresholds::default(),
            clusters: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(val) = lookup("JAVAGRAPH_EXTENSION") {
            let trimmed = val.trim().trim_start_matches('.');
            if trimmed.is_empty() {
                warn!(
                    "Invalid JAVAGRAPH_EXTENSION value: {:?}, using default: {}",
                    val, config.extension
                );
            } else {
                config.extension = trimmed.to_string();
            }
        }
        override_from(&lookup, "JAVAGRAPH_MAX_FILE_SIZE_MB", &mut config.max_file_size_mb);
        override_from(&lookup, "JAVAGRAPH_MAX_METHODS", &mut config.thresholds.max_methods);
        override_from(&lookup, "JAVAGRAPH_MAX_FIELDS", &mut config.thresholds.max_fields);
        override_from(
            &lookup,
            "JAVAGRAPH_MAX_METHOD_LINES",
            &mut config.thresholds.max_method_lines,
        );
        override_from(
            &lookup,
            "JAVAGRAPH_ENVY_MIN_CALLS",
            &mut config.thresholds.envy_min_calls,
        );
        override_from(&lookup, "JAVAGRAPH_ENVY_RATIO", &mut config.thresholds.envy_ratio);
        override_from(&lookup, "JAVAGRAPH_CLUSTERS", &mut config.clusters);

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr + std::fmt::Display,
{
    let Some(val) = lookup(key) else {
        return;
    };
    match val.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!("Invalid {key} value: {val}, using default: {slot}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extension, "java");
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.thresholds.max_methods, 20);
        assert_eq!(config.thresholds.max_method_lines, 50);
        assert_eq!(config.clusters, 5);
    }

    #[test]
    fn env_values_override_defaults() {
        let vars: HashMap<&str, &str> = [
            ("JAVAGRAPH_EXTENSION", ".jav"),
            ("JAVAGRAPH_MAX_METHODS", "3"),
            ("JAVAGRAPH_ENVY_RATIO", "2.5"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.extension, "jav");
        assert_eq!(config.thresholds.max_methods, 3);
        assert_eq!(config.thresholds.envy_ratio, 2.5);
        assert_eq!(config.thresholds.max_fields, 15);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_lookup(|key| match key {
            "JAVAGRAPH_MAX_FILE_SIZE_MB" => Some("lots".to_string()),
            "JAVAGRAPH_EXTENSION" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.extension, "java");
    }
}
