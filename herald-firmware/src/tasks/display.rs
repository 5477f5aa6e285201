//! Display event drain task
//!
//! The e-paper renderer is an external collaborator; this task is the
//! boundary. It drains the typed event queue, tracks the current page,
//! and hands each event to the renderer (logged here).

use defmt::*;

use herald_protocol::DisplayEvent;

use crate::channels::DISPLAY_EVENTS;

/// Display task - consumes display and status events
#[embassy_executor::task]
pub async fn display_task() {
    info!("Display task started");

    let mut current_page = DisplayEvent::ShowHome;
    loop {
        let event = DISPLAY_EVENTS.receive().await;
        if event.is_page_change() {
            current_page = event;
        }
        info!("display event: {:?} (page {:?})", event, current_page);
    }
}
