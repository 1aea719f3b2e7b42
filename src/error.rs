//! Recoverable validation errors surfaced to the user

use thiserror::Error;

/// Validation failures a card can report. All of these are recoverable by
/// corrective input; none of them change card state. The display text is
/// what ends up in the toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Target duration text did not match `mm:ss`
    #[error("Invalid duration, use mm:ss")]
    InvalidFormat,

    /// Start requested on a countdown with nothing left to count
    #[error("Set a countdown duration first")]
    NotReady,

    /// Mode switch attempted while the timer is running
    #[error("Stop the timer before changing mode")]
    ModeChangeRejected,
}

impl TimerError {
    /// Short machine-readable kind, used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            TimerError::InvalidFormat => "invalid_format",
            TimerError::NotReady => "not_ready",
            TimerError::ModeChangeRejected => "mode_change_rejected",
        }
    }
}
