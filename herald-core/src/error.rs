//! Error types for the command pipeline
//!
//! Every variant here is recovered locally and reported to the user as a
//! result string; none of them aborts a task.

use crate::modem::Transcript;

/// Failures a modem transaction can report to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    /// Work queue full or a slot could not be acquired in time; retryable
    Busy,
    /// No terminator arrived within the request's time budget
    Timeout,
    /// The modem answered with `ERROR`/`+CME ERROR`/`+CMS ERROR`;
    /// the transcript is carried so it can be shown verbatim
    Protocol(Transcript),
    /// Malformed input (overlong command, bad number, bad index)
    Invalid,
    /// Modem-dependent call attempted before the AT probe succeeded
    NotReady,
}

impl ModemError {
    /// Fixed user-facing message for variants that carry no transcript
    pub fn message(&self) -> &'static str {
        match self {
            ModemError::Busy => "Error: modem busy",
            ModemError::Timeout => "Error: timeout",
            ModemError::Protocol(_) => "Error: modem error",
            ModemError::Invalid => "Error: invalid input",
            ModemError::NotReady => "Error: modem not ready",
        }
    }
}
