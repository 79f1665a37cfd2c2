use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::engine::durations::{DurationRange, RandomDurations};
use crate::error::DashboardError;
use crate::events::{DEFAULT_FEED_CAPACITY, DEFAULT_LOG_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick period range; one value is drawn each time an agent starts.
    pub tick: DurationRange,
    /// Advance delay range; one value is drawn per started step.
    pub advance: DurationRange,
    pub log_capacity: usize,
    pub feed_capacity: usize,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: DurationRange::new(2000, 4000),
            advance: DurationRange::new(1200, 2400),
            log_capacity: DEFAULT_LOG_CAPACITY,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_parse("AGENTDECK_TICK_MIN_MS") {
            config.tick.min_ms = v;
        }
        if let Some(v) = env_parse("AGENTDECK_TICK_MAX_MS") {
            config.tick.max_ms = v;
        }
        if let Some(v) = env_parse("AGENTDECK_ADVANCE_MIN_MS") {
            config.advance.min_ms = v;
        }
        if let Some(v) = env_parse("AGENTDECK_ADVANCE_MAX_MS") {
            config.advance.max_ms = v;
        }
        if let Some(v) = env_parse("AGENTDECK_LOG_CAPACITY") {
            config.log_capacity = v;
        }
        if let Some(v) = env_parse("AGENTDECK_FEED_CAPACITY") {
            config.feed_capacity = v;
        }
        if let Some(v) = env_parse("AGENTDECK_PORT") {
            config.port = v;
        }
        config
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.tick.is_empty() {
            return Err(DashboardError::InvalidConfig(format!(
                "tick range {}..{} is empty",
                self.tick.min_ms, self.tick.max_ms
            )));
        }
        if self.advance.is_empty() {
            return Err(DashboardError::InvalidConfig(format!(
                "advance range {}..{} is empty",
                self.advance.min_ms, self.advance.max_ms
            )));
        }
        if self.log_capacity == 0 || self.feed_capacity == 0 {
            return Err(DashboardError::InvalidConfig(
                "capacities must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn durations(&self) -> RandomDurations {
        RandomDurations::new(self.tick, self.advance)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
