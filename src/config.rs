//! Runtime settings drawn from the environment (and `.env`, when present).

use anyhow::{Context, Result};

use crate::dashboard::DEFAULT_TARGET_RATE;
use crate::record::NumericPolicy;

pub const DEFAULT_SOURCE: &str = "ebf_data.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/ebf_stats.log";

/// Settings shared by every subcommand.
///
/// ```text
/// EBF_DATA_SOURCE=https://example.org/ebf_data.csv
/// EBF_TARGET_RATE=70
/// EBF_NUMERIC_POLICY=reject
/// LOG_FILE_PATH=logs/ebf_stats.log
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: String,
    pub target_rate: f64,
    pub numeric_policy: NumericPolicy,
    pub log_file_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: DEFAULT_SOURCE.to_string(),
            target_rate: DEFAULT_TARGET_RATE,
            numeric_policy: NumericPolicy::default(),
            log_file_path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `EBF_TARGET_RATE` or `EBF_NUMERIC_POLICY` is set
    /// to something unparseable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(source) = lookup("EBF_DATA_SOURCE") {
            settings.source = source;
        }

        if let Some(rate) = lookup("EBF_TARGET_RATE") {
            settings.target_rate = rate
                .trim()
                .parse::<f64>()
                .with_context(|| format!("EBF_TARGET_RATE is not a number: {rate:?}"))?;
        }

        if let Some(policy) = lookup("EBF_NUMERIC_POLICY") {
            settings.numeric_policy = policy
                .parse::<NumericPolicy>()
                .map_err(|e| anyhow::anyhow!("EBF_NUMERIC_POLICY: {e}"))?;
        }

        if let Some(path) = lookup("LOG_FILE_PATH") {
            settings.log_file_path = path;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.target_rate, 70.0);
        assert_eq!(settings.numeric_policy, NumericPolicy::Propagate);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("EBF_DATA_SOURCE", "https://example.org/ebf.csv"),
            ("EBF_TARGET_RATE", "65.5"),
            ("EBF_NUMERIC_POLICY", "reject"),
            ("LOG_FILE_PATH", "/tmp/ebf.log"),
        ]))
        .unwrap();

        assert_eq!(settings.source, "https://example.org/ebf.csv");
        assert_eq!(settings.target_rate, 65.5);
        assert_eq!(settings.numeric_policy, NumericPolicy::Reject);
        assert_eq!(settings.log_file_path, "/tmp/ebf.log");
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(Settings::from_lookup(lookup(&[("EBF_TARGET_RATE", "high")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("EBF_NUMERIC_POLICY", "lenient")])).is_err());
    }
}
