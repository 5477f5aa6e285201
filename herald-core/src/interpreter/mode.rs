//! Modal interpreter state
//!
//! One tagged variant instead of independent mode booleans, so two modes
//! can never be active at once.

use heapless::String;

/// Maximum stored phone number: optional `+` plus 15 digits
pub const NUMBER_MAX: usize = 16;

/// How the next submitted line will be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterpreterMode {
    /// Commands and echoable text
    #[default]
    Normal,
    /// Every line is forwarded to the modem as an AT command
    AtPassthrough,
    /// The next line is the body of an SMS to `number`
    SmsCompose { number: String<NUMBER_MAX> },
    /// Lines are message indexes (or `/d <index>`) against a listed inbox
    SmsBrowse { count: usize, show_all: bool },
}

impl InterpreterMode {
    /// True for every state `/exit` can leave
    pub fn is_modal(&self) -> bool {
        !matches!(self, InterpreterMode::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_detection() {
        assert!(!InterpreterMode::Normal.is_modal());
        assert!(InterpreterMode::AtPassthrough.is_modal());
        assert!(InterpreterMode::SmsBrowse {
            count: 3,
            show_all: true
        }
        .is_modal());
    }
}
