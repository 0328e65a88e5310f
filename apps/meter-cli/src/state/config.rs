//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--tariff`)
//! 2. Environment variables (`METER_*`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use meter_core::{TariffTable, DEFAULT_DISPLAY_DECIMALS, DEFAULT_HISTORY_LIMIT};

use crate::error::ConfigError;

/// Path to a JSON tariff table replacing the standard schedule.
pub const ENV_TARIFF_PATH: &str = "METER_TARIFF_PATH";
/// Number of history entries shown when no limit is given.
pub const ENV_HISTORY_LIMIT: &str = "METER_HISTORY_LIMIT";
/// Decimal places for the rounded money → kW result.
pub const ENV_DISPLAY_DECIMALS: &str = "METER_DISPLAY_DECIMALS";

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Active tariff table.
    pub tariff: TariffTable,

    /// Where the tariff came from; `None` means the standard schedule.
    pub tariff_path: Option<PathBuf>,

    /// Default number of entries returned by `get_history`.
    pub history_limit: usize,

    /// Decimal places for display rounding of inverse results.
    pub display_decimals: u32,
}

impl Default for ConfigState {
    /// Standard tariff, 10 history entries, 2 decimals.
    fn default() -> Self {
        ConfigState {
            tariff: TariffTable::standard(),
            tariff_path: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// `tariff` is the `--tariff` flag. When set, `METER_TARIFF_PATH` is not
    /// read at all.
    ///
    /// ## Environment Variables
    /// - `METER_TARIFF_PATH`: JSON tariff table file
    /// - `METER_HISTORY_LIMIT`: e.g. `"25"`
    /// - `METER_DISPLAY_DECIMALS`: e.g. `"3"`
    pub fn from_env(tariff: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(tariff, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(tariff: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        let tariff = tariff.or_else(|| lookup(ENV_TARIFF_PATH).map(PathBuf::from));
        if let Some(path) = tariff {
            config = config.with_tariff_file(path)?;
        }

        if let Some(value) = lookup(ENV_HISTORY_LIMIT) {
            config.history_limit = parse_env(ENV_HISTORY_LIMIT, &value)?;
        }

        if let Some(value) = lookup(ENV_DISPLAY_DECIMALS) {
            let decimals: u32 = parse_env(ENV_DISPLAY_DECIMALS, &value)?;
            // f64 carries ~15 significant digits; more places would be noise.
            if decimals > 15 {
                return Err(ConfigError::InvalidEnv {
                    key: ENV_DISPLAY_DECIMALS.to_string(),
                    value,
                    reason: "must be at most 15".to_string(),
                });
            }
            config.display_decimals = decimals;
        }

        Ok(config)
    }

    /// Replaces the tariff with the table stored in `path`.
    pub fn with_tariff_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        self.tariff = load_tariff(&path)?;
        info!(path = %path.display(), "Loaded tariff table");
        self.tariff_path = Some(path);
        Ok(self)
    }
}

/// Reads and validates a JSON tariff table.
pub fn load_tariff(path: &Path) -> Result<TariffTable, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::TariffRead {
        path: path.to_path_buf(),
        source,
    })?;

    TariffTable::from_json(&json).map_err(|source| ConfigError::TariffInvalid {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(None, lookup_from(&[])).unwrap();
        assert_eq!(config.tariff, TariffTable::standard());
        assert_eq!(config.tariff_path, None);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.display_decimals, 2);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(None, lookup_from(&[
            (ENV_HISTORY_LIMIT, "25"),
            (ENV_DISPLAY_DECIMALS, " 3 "),
        ]))
        .unwrap();
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.display_decimals, 3);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let err = ConfigState::from_lookup(None, lookup_from(&[(ENV_HISTORY_LIMIT, "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref key, .. } if key == ENV_HISTORY_LIMIT));

        let err =
            ConfigState::from_lookup(None, lookup_from(&[(ENV_DISPLAY_DECIMALS, "40")])).unwrap_err();
        assert!(err.to_string().contains("at most 15"));
    }

    #[test]
    fn test_missing_tariff_file() {
        let err = ConfigState::from_lookup(None, lookup_from(&[(
            ENV_TARIFF_PATH,
            "/nonexistent/meter-tariff.json",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::TariffRead { .. }));
    }

    #[test]
    fn test_tariff_file_replaces_standard_schedule() {
        let path = std::env::temp_dir().join(format!("meter-tariff-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{ "commercial": { "type": "flat", "rate_per_unit": 20.0 } }"#,
        )
        .unwrap();

        let config = ConfigState::default().with_tariff_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.tariff_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.tariff.categories().count(), 1);
        assert_eq!(
            config
                .tariff
                .cost(meter_core::Category::Commercial, 10.0)
                .unwrap()
                .total_cost,
            200.0
        );
    }

    #[test]
    fn test_tariff_flag_overrides_env_path() {
        let path = std::env::temp_dir().join(format!("meter-tariff-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{ "factory": { "type": "flat", "rate_per_unit": 5.0 } }"#,
        )
        .unwrap();

        // The env path is broken; the flag must win without it being read
        let result = ConfigState::from_lookup(
            Some(path.clone()),
            lookup_from(&[(ENV_TARIFF_PATH, "/nonexistent/meter-tariff.json")]),
        );
        std::fs::remove_file(&path).unwrap();

        let config = result.unwrap();
        assert_eq!(config.tariff_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config
                .tariff
                .cost(meter_core::Category::Factory, 10.0)
                .unwrap()
                .total_cost,
            50.0
        );
    }

    #[test]
    fn test_invalid_tariff_file() {
        let path = std::env::temp_dir().join(format!("meter-tariff-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_tariff(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::TariffInvalid { .. }));
    }
}
