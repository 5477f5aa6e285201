//! Modem access seam

use crate::error::ModemError;
use crate::modem::Transcript;
use crate::readiness::ReadinessFlags;

/// Everything the command interpreter needs from the cellular modem
///
/// Implementations serialize access internally; callers may be suspended
/// while earlier transactions drain.
pub trait ModemControl {
    /// Run one AT transaction and return its transcript.
    ///
    /// Ok means the transcript ended positively; Err(Protocol) carries
    /// the transcript of a completed-but-failed exchange.
    async fn send_at(&self, command: &str, timeout_ms: u32) -> Result<Transcript, ModemError>;

    /// Send one text-mode SMS: open with `AT+CMGS`, wait for the payload
    /// prompt, write the body, and collect the final status.
    async fn send_sms(&self, number: &str, body: &str) -> Result<(), ModemError>;

    /// Power the GNSS engine and read fix information. The implementation
    /// waits between the two commands so the engine can start.
    async fn gnss_read(&self) -> Result<Transcript, ModemError>;

    /// Pulse the modem power key (on if off, off if on)
    async fn toggle_power(&self);

    /// Drive the power key long enough to shut the modem down
    async fn power_off(&self);

    /// Snapshot of the tracked modem status flags
    async fn readiness(&self) -> ReadinessFlags;

    /// Reset the unread-message counter after the inbox was read
    async fn mark_sms_read(&self);

    /// Record a registered reply seen in a solicited transcript,
    /// updating the tracked flags and announcing the change
    async fn note_network_registered(&self);
}
