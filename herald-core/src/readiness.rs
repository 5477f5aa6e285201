//! Shared modem readiness state
//!
//! One guarded structure instead of free-standing globals: the engine
//! writes these on status transitions, the interpreter reads them to gate
//! modem-dependent commands. All cross-task access goes through a mutex
//! owned by the firmware.

use herald_protocol::DisplayEvent;

use crate::modem::Urc;
use crate::traits::EventSink;

/// Modem/network status flags shared between the engine and interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadinessFlags {
    /// Power-control line has been driven; the modem should be booting or up
    pub modem_powered: bool,
    /// The modem answered the startup AT probe
    pub modem_ready: bool,
    /// A registration URC reported the modem attached to the network
    pub network_registered: bool,
    /// Count of incoming-SMS notifications not yet read
    pub sms_pending: u8,
}

impl ReadinessFlags {
    /// All-clear initial state
    pub const fn new() -> Self {
        Self {
            modem_powered: false,
            modem_ready: false,
            network_registered: false,
            sms_pending: 0,
        }
    }

    /// Reset everything, as after a power-off
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Fold an unsolicited line into the flags and announce it
    pub fn apply_urc(&mut self, urc: Urc, sink: &impl EventSink) {
        match urc {
            Urc::NetworkRegistered => {
                self.network_registered = true;
                sink.post(DisplayEvent::NetworkRegistered);
            }
            Urc::SmsReceived => {
                self.sms_pending = self.sms_pending.saturating_add(1);
                sink.post(DisplayEvent::SmsReceived);
            }
            Urc::Ring => {
                sink.post(DisplayEvent::Ring);
            }
        }
    }
}
