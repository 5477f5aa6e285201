//! Typed events for the display task
//!
//! The core posts these to the display's event queue fire-and-forget; a
//! full queue drops the event. No payload is carried beyond the tag - the
//! display owns all rendering state.

/// Events the command pipeline emits toward the display task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    /// Switch to the home page
    ShowHome,
    /// Switch to the idle page
    ShowIdle,
    /// Switch to the command page
    ShowCommand,
    /// Put the panel to sleep
    Sleep,
    /// Wake the panel
    Wake,
    /// Wi-Fi radio enabled
    WifiOn,
    /// Wi-Fi association complete
    WifiConnected,
    /// Modem power line driven
    ModemPowered,
    /// Modem answered the AT probe
    ModemReady,
    /// Modem registered on the cellular network
    NetworkRegistered,
    /// Incoming SMS notification received
    SmsReceived,
    /// Incoming call (RING)
    Ring,
}

impl DisplayEvent {
    /// Returns true if this event switches the visible page
    pub fn is_page_change(&self) -> bool {
        matches!(
            self,
            DisplayEvent::ShowHome | DisplayEvent::ShowIdle | DisplayEvent::ShowCommand
        )
    }

    /// Returns true if this event reports modem status
    pub fn is_modem_status(&self) -> bool {
        matches!(
            self,
            DisplayEvent::ModemPowered
                | DisplayEvent::ModemReady
                | DisplayEvent::NetworkRegistered
                | DisplayEvent::SmsReceived
                | DisplayEvent::Ring
        )
    }
}
