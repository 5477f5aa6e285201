//! Configuration type definitions
//!
//! Typed settings for the modem engine, keyboard polling, and SMS
//! handling. Defaults match the SIM7600-class modem and I2C keyboard the
//! device ships with; boards override fields at bring-up.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum entries in the baud probe table
pub const MAX_BAUDS: usize = 4;

/// Maximum length of the SMS list-response marker
pub const MAX_MARKER_LEN: usize = 16;

/// Modem engine settings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModemConfig {
    /// Baud rates tried during the startup AT probe, in order
    pub bauds: Vec<u32, MAX_BAUDS>,
    /// Cold-boot settle delay before the first probe (ms)
    pub settle_ms: u32,
    /// Probe attempts per baud rate
    pub probe_attempts: u8,
    /// Time budget per probe attempt (ms)
    pub probe_timeout_ms: u32,
    /// Default budget for ordinary AT transactions (ms)
    pub at_timeout_ms: u32,
    /// Budget for network attachment queries (ms)
    pub net_timeout_ms: u32,
    /// Budget for SMS list/read/send transactions (ms)
    pub sms_timeout_ms: u32,
    /// Budget for GNSS info queries (ms)
    pub gnss_timeout_ms: u32,
    /// Wait between enabling GNSS and reading fix info (ms)
    pub gnss_fix_delay_ms: u32,
    /// Power-control line pulse width (ms)
    pub pwrkey_pulse_ms: u32,
}

impl Default for ModemConfig {
    fn default() -> Self {
        let mut bauds = Vec::new();
        for baud in [115_200, 57_600, 9_600] {
            let _ = bauds.push(baud);
        }
        Self {
            bauds,
            settle_ms: 2_500,
            probe_attempts: 2,
            probe_timeout_ms: 1_000,
            at_timeout_ms: 5_000,
            net_timeout_ms: 3_000,
            sms_timeout_ms: 10_000,
            gnss_timeout_ms: 5_000,
            gnss_fix_delay_ms: 800,
            pwrkey_pulse_ms: 500,
        }
    }
}

/// I2C keyboard settings
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyboardConfig {
    /// 7-bit I2C address of the keyboard controller
    pub address: u8,
    /// Poll interval (ms)
    pub poll_ms: u32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            address: 0x5F,
            poll_ms: 100,
        }
    }
}

/// SMS handling settings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmsConfig {
    /// Line prefix marking one message in a `+CMGL` list response.
    /// The exact text depends on the modem firmware, so it is
    /// configuration rather than a hard constant.
    pub list_marker: String<MAX_MARKER_LEN>,
}

impl Default for SmsConfig {
    fn default() -> Self {
        let mut list_marker = String::new();
        let _ = list_marker.push_str("+CMGL:");
        Self { list_marker }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub modem: ModemConfig,
    pub keyboard: KeyboardConfig,
    pub sms: SmsConfig,
}
