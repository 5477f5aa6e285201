//! Inter-task communication channels
//!
//! Static channels, signals and guarded state shared between Embassy
//! tasks. Responses travel back through [`RESPONSE_ARENA`]: the caller
//! acquires a slot index, attaches it to the job, and waits on that
//! slot alone; a caller that gives up retires its slot so a late
//! completion from the engine can never land in a reused one.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;

use herald_core::buffer::CommandBuffer;
use herald_core::modem::{JobKind, ResponseSlots};
use herald_core::readiness::ReadinessFlags;
use herald_protocol::DisplayEvent;

/// Depth of the modem work queue, and the size of the slot arena
pub const ENGINE_QUEUE_SIZE: usize = 4;

/// Channel capacity for display events
const DISPLAY_CHANNEL_SIZE: usize = 8;

/// One unit of work for the modem engine
#[derive(Debug)]
pub struct EngineJob {
    pub kind: JobKind,
    /// Index into [`RESPONSE_ARENA`] where the transcript is delivered
    pub slot: usize,
}

/// Modem power-control actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerCommand {
    /// One power-key pulse (on if off, off if on)
    Pulse,
    /// Hold the power key until the modem shuts down
    Off,
}

/// Work queue feeding the modem engine
pub static MODEM_JOBS: Channel<CriticalSectionRawMutex, EngineJob, ENGINE_QUEUE_SIZE> =
    Channel::new();

/// Response slot arena; callers wait here, the engine completes here
pub static RESPONSE_ARENA: ResponseSlots<ENGINE_QUEUE_SIZE> = ResponseSlots::new();

/// Display events, dropped when the sink falls behind
pub static DISPLAY_EVENTS: Channel<CriticalSectionRawMutex, DisplayEvent, DISPLAY_CHANNEL_SIZE> =
    Channel::new();

/// Power-control requests for the modem power task
pub static POWER_CMDS: Channel<CriticalSectionRawMutex, PowerCommand, 2> = Channel::new();

/// The shared command page state
pub static COMMAND_BUFFER: Mutex<CriticalSectionRawMutex, CommandBuffer> =
    Mutex::new(CommandBuffer::new());

/// Modem status flags shared between the engine and the interpreter
pub static READINESS: Mutex<CriticalSectionRawMutex, ReadinessFlags> =
    Mutex::new(ReadinessFlags::new());

/// Make every response slot available; called once before tasks spawn
pub fn seed_response_slots() {
    RESPONSE_ARENA.seed();
}

/// Fire-and-forget display event enqueue
pub fn post_display_event(event: DisplayEvent) {
    if DISPLAY_EVENTS.try_send(event).is_err() {
        defmt::warn!("display channel full, dropping event");
    }
}
