//! Runtime configuration, read from the environment once at startup.

use std::{env, ops::RangeInclusive, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("first year {first} is after last year {last}")]
    YearRange { first: i32, last: i32 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    /// When set, documents are fetched over HTTP from here instead of `data_dir`.
    pub data_url: Option<String>,
    pub load_timeout: Duration,
    pub first_year: i32,
    /// Also the year shown as still in progress.
    pub last_year: i32,
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_FIRST_YEAR: i32 = 2019;
const DEFAULT_LAST_YEAR: i32 = 2026;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
            data_url: None,
            load_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            data_dir: lookup("APERI_DATA_DIR")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            data_url: lookup("APERI_DATA_URL")
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty()),
            load_timeout: Duration::from_millis(parse_or(
                &lookup,
                "APERI_LOAD_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            )),
            first_year: parse_or(&lookup, "APERI_FIRST_YEAR", defaults.first_year),
            last_year: parse_or(&lookup, "APERI_LAST_YEAR", defaults.last_year),
        };

        if config.first_year > config.last_year {
            return Err(ConfigError::YearRange {
                first: config.first_year,
                last: config.last_year,
            });
        }
        Ok(config)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }
    }
}
