//! Keycode classification for the I2C keyboard
//!
//! The keyboard yields one 8-bit keycode per poll. 0x00 means "no key
//! pressed" and is filtered out before classification. Printable ASCII
//! occupies 0x20-0x7E; a reserved band 0x80-0xAF carries fixed function
//! keys for page switching and sleep/wake.

/// Distinguished "no key pressed" value
pub const KEY_NONE: u8 = 0x00;

/// Backspace keycode
pub const KEY_BACKSPACE: u8 = 0x08;
/// Enter / submit keycode
pub const KEY_ENTER: u8 = 0x0D;
/// Escape / cancel keycode
pub const KEY_ESCAPE: u8 = 0x1B;
/// Delete keycode (treated as backspace)
pub const KEY_DELETE: u8 = 0x7F;

/// Inclusive bounds of the reserved function-key band
pub const FUNCTION_BAND_START: u8 = 0x80;
pub const FUNCTION_BAND_END: u8 = 0xAF;

// Function key assignments (fixed by the keyboard firmware)
const KEY_SLEEP_WAKE: u8 = 0x80;
const KEY_SHOW_IDLE: u8 = 0x94;
const KEY_SHOW_HOME: u8 = 0x9F;
const KEY_SHOW_COMMAND: u8 = 0xA8;

/// Fixed function keys in the reserved band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FunctionKey {
    /// Toggle panel sleep/wake
    SleepWake,
    /// Switch to the idle page
    ShowIdle,
    /// Switch to the home page
    ShowHome,
    /// Switch to the command page
    ShowCommand,
}

impl FunctionKey {
    /// Map a keycode in the function band to its function, if assigned
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            KEY_SLEEP_WAKE => Some(FunctionKey::SleepWake),
            KEY_SHOW_IDLE => Some(FunctionKey::ShowIdle),
            KEY_SHOW_HOME => Some(FunctionKey::ShowHome),
            KEY_SHOW_COMMAND => Some(FunctionKey::ShowCommand),
            _ => None,
        }
    }

    /// The keycode this function is assigned to
    pub fn code(self) -> u8 {
        match self {
            FunctionKey::SleepWake => KEY_SLEEP_WAKE,
            FunctionKey::ShowIdle => KEY_SHOW_IDLE,
            FunctionKey::ShowHome => KEY_SHOW_HOME,
            FunctionKey::ShowCommand => KEY_SHOW_COMMAND,
        }
    }
}

/// Classified keycode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Printable ASCII (0x20-0x7E)
    Printable(u8),
    /// Backspace or Delete
    Backspace,
    /// Enter (submit line)
    Enter,
    /// Escape (cancel)
    Escape,
    /// Mapped function key from the reserved band
    Function(FunctionKey),
    /// Keycode in the reserved band with no assigned function
    UnmappedFunction(u8),
    /// Anything else (ignored)
    Unknown(u8),
}

impl Key {
    /// Classify a raw keycode
    ///
    /// The function band is checked before everything else so function
    /// keys are intercepted ahead of normal key handling.
    pub fn from_code(code: u8) -> Self {
        if (FUNCTION_BAND_START..=FUNCTION_BAND_END).contains(&code) {
            return match FunctionKey::from_code(code) {
                Some(f) => Key::Function(f),
                None => Key::UnmappedFunction(code),
            };
        }
        match code {
            KEY_BACKSPACE | KEY_DELETE => Key::Backspace,
            KEY_ENTER => Key::Enter,
            KEY_ESCAPE => Key::Escape,
            0x20..=0x7E => Key::Printable(code),
            other => Key::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_key_roundtrip() {
        let keys = [
            FunctionKey::SleepWake,
            FunctionKey::ShowIdle,
            FunctionKey::ShowHome,
            FunctionKey::ShowCommand,
        ];
        for key in keys {
            assert_eq!(FunctionKey::from_code(key.code()), Some(key));
        }
    }

    #[test]
    fn test_printable_range() {
        assert_eq!(Key::from_code(b'a'), Key::Printable(b'a'));
        assert_eq!(Key::from_code(0x20), Key::Printable(0x20));
        assert_eq!(Key::from_code(0x7E), Key::Printable(0x7E));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(Key::from_code(0x08), Key::Backspace);
        assert_eq!(Key::from_code(0x7F), Key::Backspace);
        assert_eq!(Key::from_code(0x0D), Key::Enter);
        assert_eq!(Key::from_code(0x1B), Key::Escape);
    }

    #[test]
    fn test_function_band_intercepted() {
        assert_eq!(
            Key::from_code(0x9F),
            Key::Function(FunctionKey::ShowHome)
        );
        assert_eq!(
            Key::from_code(0xA8),
            Key::Function(FunctionKey::ShowCommand)
        );
        // In-band but unassigned codes are reported, not dropped
        assert_eq!(Key::from_code(0x81), Key::UnmappedFunction(0x81));
        assert_eq!(Key::from_code(0xAF), Key::UnmappedFunction(0xAF));
    }

    #[test]
    fn test_out_of_band_unknown() {
        assert_eq!(Key::from_code(0x01), Key::Unknown(0x01));
        assert_eq!(Key::from_code(0xB0), Key::Unknown(0xB0));
        assert_eq!(Key::from_code(0xFF), Key::Unknown(0xFF));
    }
}
