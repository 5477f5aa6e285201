//! Seams between the pure interpreter and the firmware
//!
//! The interpreter talks to hardware only through these traits. The
//! firmware crate implements them over its queues and signals; tests
//! implement them over scripted fakes.

pub mod events;
pub mod modem;

pub use events::EventSink;
pub use modem::ModemControl;
