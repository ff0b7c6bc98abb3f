// Error types for alarm planning
// Malformed alarm or recurrence data is rejected, never coerced to a default

use thiserror::Error;

/// Rejection raised while parsing alarm data or building an occurrence sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmError {
    #[error("invalid alarm trigger '{0}'")]
    InvalidTrigger(String),

    #[error("repeat interval must be at least 1, got {0}")]
    InvalidInterval(u32),

    #[error("repeat count must be at least 1")]
    InvalidCount,

    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("invalid {rule} value '{value}'")]
    InvalidByRule { rule: String, value: String },

    #[error("by-day rules select no weekday")]
    EmptyByDay,

    #[error("occurrence limits must be positive")]
    InvalidLimit,
}
