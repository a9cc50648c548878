//! Board timing and refresh configuration.
//!
//! Durations are expressed in milliseconds on the wire.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use taskboard::board::config::BoardConfig;
//!
//! let config = BoardConfig::from_json_str(r#"{ "poll_interval_ms": 5000 }"#)
//!     .expect("valid configuration");
//! assert_eq!(config.poll_interval, Duration::from_secs(5));
//! assert_eq!(config.bus_debounce, Duration::from_millis(100));
//! ```

use crate::board::domain::BoardEventKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default interval between unconditional polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Default window during which bus events collapse into one fetch.
pub const DEFAULT_BUS_DEBOUNCE: Duration = Duration::from_millis(100);
/// Default delay between a committed move and the authoritative re-fetch.
pub const DEFAULT_POST_MUTATION_REFRESH_DELAY: Duration = Duration::from_millis(300);

/// Errors returned while loading a board configuration.
#[derive(Debug, Error)]
pub enum BoardConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid board configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timer duration was zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// The bus capacity was zero.
    #[error("bus_capacity must be greater than zero")]
    ZeroCapacity,
}

/// Timing and refresh policy for one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Interval between unconditional polls.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
    /// Debounce window for bus-triggered refreshes.
    #[serde(rename = "bus_debounce_ms", with = "millis")]
    pub bus_debounce: Duration,
    /// Delay before re-fetching after a committed move.
    #[serde(rename = "post_mutation_refresh_delay_ms", with = "millis")]
    pub post_mutation_refresh_delay: Duration,
    /// Buffer size for the in-process bus.
    pub bus_capacity: usize,
    /// Discard fetch responses older than the last applied one instead of
    /// letting the last completed fetch win.
    pub discard_stale_fetches: bool,
    /// Bus events that trigger a refresh.
    pub refresh_on: Vec<BoardEventKind>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            bus_debounce: DEFAULT_BUS_DEBOUNCE,
            post_mutation_refresh_delay: DEFAULT_POST_MUTATION_REFRESH_DELAY,
            bus_capacity: crate::board::adapters::memory::DEFAULT_BUS_CAPACITY,
            discard_stale_fetches: false,
            refresh_on: BoardEventKind::ALL.to_vec(),
        }
    }
}

impl BoardConfig {
    /// Parses and validates a JSON configuration document. Missing keys take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError`] when the document does not parse or a
    /// value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, BoardConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every timer and buffer is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::ZeroDuration`] or
    /// [`BoardConfigError::ZeroCapacity`].
    pub fn validate(&self) -> Result<(), BoardConfigError> {
        if self.poll_interval.is_zero() {
            return Err(BoardConfigError::ZeroDuration("poll_interval_ms"));
        }
        if self.bus_debounce.is_zero() {
            return Err(BoardConfigError::ZeroDuration("bus_debounce_ms"));
        }
        if self.post_mutation_refresh_delay.is_zero() {
            return Err(BoardConfigError::ZeroDuration(
                "post_mutation_refresh_delay_ms",
            ));
        }
        if self.bus_capacity == 0 {
            return Err(BoardConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Returns `true` when events of `kind` trigger a refresh.
    #[must_use]
    pub fn refreshes_on(&self, kind: BoardEventKind) -> bool {
        self.refresh_on.contains(&kind)
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the bus debounce window.
    #[must_use]
    pub const fn with_bus_debounce(mut self, window: Duration) -> Self {
        self.bus_debounce = window;
        self
    }

    /// Enables or disables discarding of stale fetch responses.
    #[must_use]
    pub const fn with_discard_stale_fetches(mut self, discard: bool) -> Self {
        self.discard_stale_fetches = discard;
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
