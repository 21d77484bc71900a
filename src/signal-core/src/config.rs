//! Configuration loading from environment variables.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: String, value: String },
}

/// Cycle timing and threshold settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    /// Runner-up frequency (percent) that starts a cycle
    pub threshold_pct: Decimal,
    /// Countdown length before the entry window opens
    pub prep_seconds: u32,
    /// Length of the entry window
    pub entry_seconds: u32,
}

impl CycleConfig {
    /// Thresholds are percentages in `0..=100`.
    pub fn is_valid_threshold(pct: &Decimal) -> bool {
        *pct >= Decimal::ZERO && *pct <= dec!(100)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            threshold_pct: dec!(12.5),
            prep_seconds: 20,
            entry_seconds: 16,
        }
    }
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sliding window capacity in digits
    pub window_capacity: usize,

    /// Cycle threshold and phase lengths
    pub cycle: CycleConfig,

    /// Cycle tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_capacity: 64,
            cycle: CycleConfig::default(),
            tick_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional variables (with defaults):
    /// - WINDOW_CAPACITY: digits kept in the window (default: 64)
    /// - SIGNAL_THRESHOLD_PCT: runner-up threshold in percent (default: 12.5)
    /// - PREP_SECONDS: preparation countdown (default: 20)
    /// - ENTRY_SECONDS: entry window length (default: 16)
    /// - TICK_INTERVAL_MS: cycle tick interval (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_env_only()
    }

    /// Load configuration from environment variables only (no .env file).
    /// Useful for testing.
    pub fn from_env_only() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let window_capacity = parse_var("WINDOW_CAPACITY", defaults.window_capacity, |v| *v >= 1)?;
        let threshold_pct = parse_var(
            "SIGNAL_THRESHOLD_PCT",
            defaults.cycle.threshold_pct,
            CycleConfig::is_valid_threshold,
        )?;
        let prep_seconds = parse_var("PREP_SECONDS", defaults.cycle.prep_seconds, |_| true)?;
        let entry_seconds = parse_var("ENTRY_SECONDS", defaults.cycle.entry_seconds, |_| true)?;
        let tick_interval_ms = parse_var("TICK_INTERVAL_MS", defaults.tick_interval_ms, |v| *v > 0)?;

        Ok(Self {
            window_capacity,
            cycle: CycleConfig {
                threshold_pct,
                prep_seconds,
                entry_seconds,
            },
            tick_interval_ms,
        })
    }
}

/// Read an optional variable. Missing means default; present but unparseable
/// or rejected by `valid` is an error.
fn parse_var<T, F>(name: &str, default: T, valid: F) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Ok(value),
        _ => Err(ConfigError::InvalidVar {
            name: name.to_string(),
            value: raw,
        }),
    }
}
