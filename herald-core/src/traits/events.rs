//! Display event seam

use herald_protocol::DisplayEvent;

/// Consumer of display and status events
///
/// Posting must never block; implementations drop events when their
/// queue is full.
pub trait EventSink {
    fn post(&self, event: DisplayEvent);
}
