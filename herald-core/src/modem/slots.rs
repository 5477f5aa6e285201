//! Response slot arena
//!
//! Completions travel back from the engine through a fixed set of
//! signal slots. A caller takes a slot, attaches its index to the job,
//! and waits on that slot alone; the engine signals each slot at most
//! once per job. A caller that gives up retires its slot instead of
//! returning it, so a late completion can never land in a reused slot.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use super::Transcript;

/// Fixed pool of response slots shared by callers and the engine
pub struct ResponseSlots<const N: usize> {
    free: Channel<CriticalSectionRawMutex, usize, N>,
    signals: [Signal<CriticalSectionRawMutex, Transcript>; N],
}

impl<const N: usize> ResponseSlots<N> {
    pub const fn new() -> Self {
        Self {
            free: Channel::new(),
            signals: [const { Signal::new() }; N],
        }
    }

    /// Make every slot available; called once before any caller runs
    pub fn seed(&self) {
        for slot in 0..N {
            let _ = self.free.try_send(slot);
        }
    }

    /// Take a free slot, clearing any stale completion
    pub fn acquire(&self) -> Option<usize> {
        let slot = self.free.try_receive().ok()?;
        self.signals[slot].reset();
        Some(slot)
    }

    /// Deliver the transcript for the job holding this slot
    pub fn complete(&self, slot: usize, transcript: Transcript) {
        self.signals[slot].signal(transcript);
    }

    /// Wait for this slot's completion
    pub async fn wait(&self, slot: usize) -> Transcript {
        self.signals[slot].wait().await
    }

    /// Return a slot whose transcript was taken
    pub fn release(&self, slot: usize) {
        let _ = self.free.try_send(slot);
    }

    /// Abandon a slot. It never returns to the free pool, so the
    /// engine's eventual completion lands in a signal nothing waits on.
    pub fn retire(&self, _slot: usize) {}
}

impl<const N: usize> Default for ResponseSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}
