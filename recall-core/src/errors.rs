use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("quality score must be between 0 and 5, got {0}")]
    InvalidQuality(i64),
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(i64),
    #[error("storage error: {0}")]
    Storage(&'static str),
}

/// Failures of the external text-advice capability. None of these ever reach
/// callers of the scheduler; they collapse to a neutral multiplier.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),
    #[error("advisor timed out")]
    Timeout,
    #[error("advisor request cancelled")]
    Cancelled,
    #[error("advisor failed: {0}")]
    Failed(String),
}
