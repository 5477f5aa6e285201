//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod display;
pub mod keyboard;
pub mod modem;
pub mod power;

pub use display::display_task;
pub use keyboard::keyboard_task;
pub use modem::modem_engine_task;
pub use power::power_task;
