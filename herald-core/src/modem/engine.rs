//! Transaction engine loop
//!
//! Drives one queued job against the modem transport: transmit, then
//! collect lines until a terminator or the response window closes. The
//! transport seam keeps hardware and timer types out of the loop, so
//! the queue discipline runs on the host under test.

use heapless::Vec;

use super::{
    AtRequest, FeedOutcome, LineAssembler, ResponseAccumulator, Transcript, TIMEOUT_MARKER,
};

/// Maximum raw payload: an SMS body plus the Ctrl-Z terminator
pub const RAW_PAYLOAD_MAX: usize = 258;

/// Extra caller-side wait beyond the engine's own response window
pub const TIMEOUT_MARGIN_MS: u32 = 500;

/// Caller backstop for one job. The engine fails a job no earlier than
/// its own window, so a caller waiting this long always hears back
/// unless the engine itself has stalled.
pub fn backstop_ms(timeout_ms: u32) -> u32 {
    timeout_ms.saturating_add(TIMEOUT_MARGIN_MS)
}

/// Transport write failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportError;

/// One receive step from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    Byte(u8),
    /// The armed response window closed with no byte available
    Elapsed,
}

/// Byte transport one transaction runs over
///
/// The implementation owns the clock: `arm` opens the response window
/// and `receive` reports [`RxEvent::Elapsed`] once it closes. Read
/// errors are the transport's to retry; only write failures surface.
pub trait EngineTransport {
    async fn transmit(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
    fn arm(&mut self, timeout_ms: u32);
    async fn receive(&mut self) -> RxEvent;
}

/// What the engine should transmit for one job
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobKind {
    /// An AT transaction
    At(AtRequest),
    /// Raw bytes (an SMS body) written to the transport, then lines
    /// collected until a terminator
    Raw {
        payload: Vec<u8, RAW_PAYLOAD_MAX>,
        timeout_ms: u32,
    },
}

/// The transcript reported when no terminator arrived in time
pub fn timeout_transcript() -> Transcript {
    let mut marker = Transcript::new();
    let _ = marker.push_str(TIMEOUT_MARKER);
    marker
}

/// Run one job to completion, producing exactly one transcript
///
/// A transmit failure fails the job immediately; nothing is read for a
/// job whose bytes never reached the modem.
pub async fn run_job<T: EngineTransport>(
    transport: &mut T,
    assembler: &mut LineAssembler,
    kind: &JobKind,
) -> Transcript {
    // A stale partial line from the idle phase does not belong to this job
    assembler.reset();

    let (timeout_ms, expect_terminator) = match kind {
        JobKind::At(request) => {
            if !request.suppress_transmit
                && (transport.transmit(request.command.as_bytes()).await.is_err()
                    || transport.transmit(b"\r\n").await.is_err())
            {
                return timeout_transcript();
            }
            (request.timeout_ms, request.expect_terminator)
        }
        JobKind::Raw { payload, timeout_ms } => {
            if transport.transmit(payload).await.is_err() {
                return timeout_transcript();
            }
            (*timeout_ms, true)
        }
    };

    let mut accumulator = ResponseAccumulator::new(expect_terminator);
    transport.arm(timeout_ms);
    loop {
        match transport.receive().await {
            RxEvent::Byte(byte) => {
                let Some(line) = assembler.feed(byte) else {
                    continue;
                };
                match accumulator.feed_line(&line) {
                    FeedOutcome::Pending => {}
                    FeedOutcome::Complete | FeedOutcome::Prompt => {
                        return accumulator.into_transcript();
                    }
                }
            }
            RxEvent::Elapsed => {
                // Any late bytes belong to no one; drop the partial line
                assembler.reset();
                return timeout_transcript();
            }
        }
    }
}
