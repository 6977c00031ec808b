use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;

use crate::core::paginator::PaginatorOptions;
use crate::utils;

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// SDK configuration: embedded defaults, optionally overridden by a config
/// file in the host's feedkit config directory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_load_more_threshold")]
    pub load_more_threshold: usize,
    /// How many redacted stand-ins a cold-started list shows.
    #[serde(default = "default_placeholder_count")]
    pub placeholder_count: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            load_more_threshold: default_load_more_threshold(),
            placeholder_count: default_placeholder_count(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    #[serde(default = "default_backfill_interval_secs")]
    pub backfill_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
            backfill_interval_secs: default_backfill_interval_secs(),
        }
    }
}

fn default_page_size() -> usize {
    15
}

fn default_load_more_threshold() -> usize {
    2
}

fn default_placeholder_count() -> usize {
    12
}

fn default_event_capacity() -> usize {
    32
}

fn default_backfill_interval_secs() -> u64 {
    30
}

impl Config {
    /// Loads the embedded defaults, merged with the first config file found in
    /// the host's config directory. A host with no config file gets the
    /// defaults; an SDK must work unconfigured.
    pub fn new() -> Result<Self, ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))?;
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();

        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?
            .set_default(
                "pagination.page_size",
                default_config.pagination.page_size as u64,
            )?
            .set_default(
                "pagination.load_more_threshold",
                default_config.pagination.load_more_threshold as u64,
            )?
            .set_default(
                "pagination.placeholder_count",
                default_config.pagination.placeholder_count as u64,
            )?
            .set_default("sync.event_capacity", default_config.sync.event_capacity as u64)?
            .set_default(
                "sync.backfill_interval_secs",
                default_config.sync.backfill_interval_secs,
            )?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        Self::validate(&cfg)?;

        Ok(cfg)
    }

    fn validate(cfg: &Self) -> Result<(), ConfigError> {
        if cfg.pagination.page_size == 0 {
            return Err(ConfigError::Message(String::from(
                "pagination.page_size must be positive",
            )));
        }

        if cfg.pagination.load_more_threshold >= cfg.pagination.page_size {
            return Err(ConfigError::Message(String::from(
                "pagination.load_more_threshold must be smaller than pagination.page_size",
            )));
        }

        Ok(())
    }

    pub fn paginator_options(&self) -> PaginatorOptions {
        PaginatorOptions {
            page_size: self.pagination.page_size,
            load_more_threshold: self.pagination.load_more_threshold,
            event_capacity: self.sync.event_capacity,
        }
    }

    pub fn backfill_interval(&self) -> Duration {
        Duration::from_secs(self.sync.backfill_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = json5::from_str(CONFIG).expect("embedded config must parse");
        assert_eq!(config.pagination.page_size, 15);
        assert_eq!(config.pagination.load_more_threshold, 2);
        assert_eq!(config.pagination.placeholder_count, 12);
        assert_eq!(config.sync.event_capacity, 32);
        assert_eq!(config.sync.backfill_interval_secs, 30);
    }

    #[test]
    fn test_new_falls_back_to_defaults_without_a_file() {
        let config = Config::new().expect("defaults must load");
        assert_eq!(config.pagination.page_size, 15);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            pagination: PaginationConfig {
                page_size: 0,
                ..PaginationConfig::default()
            },
            ..Config::default()
        };

        assert!(Config::validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_threshold_at_page_size() {
        let config = Config {
            pagination: PaginationConfig {
                page_size: 10,
                load_more_threshold: 10,
                ..PaginationConfig::default()
            },
            ..Config::default()
        };

        assert!(Config::validate(&config).is_err());
    }

    #[test]
    fn test_paginator_options_conversion() {
        let config = Config::default();
        let options = config.paginator_options();

        assert_eq!(options.page_size, 15);
        assert_eq!(options.load_more_threshold, 2);
        assert_eq!(options.event_capacity, 32);
        assert_eq!(config.backfill_interval(), Duration::from_secs(30));
    }
}
