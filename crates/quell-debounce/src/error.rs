use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DebounceError {
    #[error("debounce delay must not be negative, got {0} ms")]
    NegativeDelay(i64),
    #[error("debounce delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f64),
}
