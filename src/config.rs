//! Environment-driven configuration.
//!
//! Values are read from the process environment after loading an optional
//! `.env` file. Everything has a default so an empty environment is valid.

use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::pricing::HolidayCalendar;

pub const DEFAULT_RULE_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_RULE_CACHE_CAPACITY: u64 = 256;

/// Configuration parsing error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: unknown timezone '{value}'")]
    Timezone { var: &'static str, value: String },

    #[error("{var}: invalid holiday entry '{value}' (expected YYYY-MM-DD or MM-DD)")]
    Holiday { var: &'static str, value: String },

    #[error("{var}: expected a non-negative integer, got '{value}'")]
    Number { var: &'static str, value: String },
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Facility timezone, used only where a calendar date meets an instant
    pub timezone: Tz,
    pub holidays: HolidayCalendar,
    pub rule_cache_ttl: Duration,
    pub rule_cache_capacity: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            holidays: HolidayCalendar::default(),
            rule_cache_ttl: Duration::from_secs(DEFAULT_RULE_CACHE_TTL_SECS),
            rule_cache_capacity: DEFAULT_RULE_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Load `.env` (if present) and read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(lookup("FACILITY_TIMEZONE")) {
            config.timezone = value.parse::<Tz>().map_err(|_| ConfigError::Timezone {
                var: "FACILITY_TIMEZONE",
                value: value.clone(),
            })?;
        }

        if let Some(value) = non_empty(lookup("HOLIDAYS")) {
            config.holidays = parse_holidays(&value)?;
        }

        if let Some(value) = non_empty(lookup("RULE_CACHE_TTL_SECS")) {
            config.rule_cache_ttl =
                Duration::from_secs(parse_number("RULE_CACHE_TTL_SECS", &value)?);
        }

        if let Some(value) = non_empty(lookup("RULE_CACHE_CAPACITY")) {
            config.rule_cache_capacity = parse_number("RULE_CACHE_CAPACITY", &value)?;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::Number {
        var,
        value: value.to_string(),
    })
}

/// Parse `HOLIDAYS`: `2025-07-04` is a one-off date, `12-25` recurs yearly.
fn parse_holidays(value: &str) -> Result<HolidayCalendar, ConfigError> {
    let mut calendar = HolidayCalendar::default();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let bad = || ConfigError::Holiday {
            var: "HOLIDAYS",
            value: entry.to_string(),
        };
        match entry.len() {
            10 => {
                let date = NaiveDate::parse_from_str(entry, "%Y-%m-%d").map_err(|_| bad())?;
                calendar.add_date(date);
            }
            5 => {
                let (month, day) = entry.split_once('-').ok_or_else(bad)?;
                let month = month.parse::<u32>().map_err(|_| bad())?;
                let day = day.parse::<u32>().map_err(|_| bad())?;
                if !calendar.add_recurring(month, day) {
                    return Err(bad());
                }
            }
            _ => return Err(bad()),
        }
    }
    Ok(calendar)
}
