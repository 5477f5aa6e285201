//! AT transaction building blocks
//!
//! Everything here is host-testable: byte-to-line assembly, transcript
//! accumulation with terminator detection, the success rule for
//! finished transcripts, unsolicited-line classification, GNSS response
//! parsing, the transaction engine loop, and the response slot arena.
//! The firmware binds the loop to the physical UART and the clock.

pub mod engine;
pub mod gnss;
pub mod line;
pub mod response;
pub mod slots;
pub mod urc;

pub use engine::{
    backstop_ms, run_job, EngineTransport, JobKind, RxEvent, TransportError, RAW_PAYLOAD_MAX,
    TIMEOUT_MARGIN_MS,
};
pub use line::LineAssembler;
pub use response::{is_terminator_line, transcript_ok, FeedOutcome, ResponseAccumulator};
pub use slots::ResponseSlots;
pub use urc::{classify, Urc};

use heapless::String;

use crate::error::ModemError;

/// Maximum AT command length (without the appended terminator)
pub const COMMAND_MAX: usize = 256;

/// Maximum accumulated transcript length
pub const TRANSCRIPT_MAX: usize = 1024;

/// Maximum length of a single received line
pub const LINE_MAX: usize = 256;

/// Newline-joined response lines for one transaction
pub type Transcript = String<TRANSCRIPT_MAX>;

/// Transcript written in place of a response when no terminator arrived
pub const TIMEOUT_MARKER: &str = "TIMEOUT";

/// Byte terminating a raw SMS body
pub const CTRL_Z: u8 = 0x1A;

/// Line the modem sends when prompting for a raw payload
pub const PROMPT: &str = ">";

/// One queued AT transaction
///
/// Owned by the issuing call until enqueued, exclusively by the engine
/// from dequeue until it signals completion, then by the caller again to
/// read the result. No field is ever shared between the two sides.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtRequest {
    /// Command text; the engine appends `\r\n` on transmit
    pub command: String<COMMAND_MAX>,
    /// Time budget from transmit to terminator (ms)
    pub timeout_ms: u32,
    /// Multi-line reply ending in a terminator line, vs. first line wins
    pub expect_terminator: bool,
    /// Transmit nothing; only collect lines until a terminator
    pub suppress_transmit: bool,
}

impl AtRequest {
    /// Ordinary multi-line transaction. The fields are public; callers
    /// with unusual needs adjust them on the constructed value.
    pub fn new(command: &str, timeout_ms: u32) -> Result<Self, ModemError> {
        let mut text = String::new();
        text.push_str(command).map_err(|_| ModemError::Invalid)?;
        Ok(Self {
            command: text,
            timeout_ms,
            expect_terminator: true,
            suppress_transmit: false,
        })
    }
}

/// Build the `AT+CMGS="<number>"` command opening an SMS send
pub fn cmgs_command(number: &str) -> Result<String<COMMAND_MAX>, ModemError> {
    let mut cmd: String<COMMAND_MAX> = String::new();
    cmd.push_str("AT+CMGS=\"").map_err(|_| ModemError::Invalid)?;
    cmd.push_str(number).map_err(|_| ModemError::Invalid)?;
    cmd.push('"').map_err(|_| ModemError::Invalid)?;
    Ok(cmd)
}
