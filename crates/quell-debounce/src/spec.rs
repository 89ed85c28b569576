use web_time::Duration;

use crate::error::DebounceError;

/// How long a debouncer waits for quiet before running its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebounceSpec {
    pub delay: Duration,
}

impl Default for DebounceSpec {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }
}

impl DebounceSpec {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Negative values are rejected rather than clamped.
    pub fn from_millis(ms: i64) -> Result<Self, DebounceError> {
        u64::try_from(ms)
            .map(|ms| Self::new(Duration::from_millis(ms)))
            .map_err(|_| DebounceError::NegativeDelay(ms))
    }

    pub fn from_secs_f64(secs: f64) -> Result<Self, DebounceError> {
        Duration::try_from_secs_f64(secs)
            .map(Self::new)
            .map_err(|_| DebounceError::InvalidDelay(secs))
    }

    /// Runs on the next pass of the host loop.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn fast() -> Self {
        Self::new(Duration::from_millis(150))
    }

    pub fn slow() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

impl From<Duration> for DebounceSpec {
    fn from(delay: Duration) -> Self {
        Self::new(delay)
    }
}
