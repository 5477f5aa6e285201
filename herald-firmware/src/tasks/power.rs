//! Modem power task
//!
//! Owns the modem power-key line. Power actions are fire-and-forget
//! hardware pulses, deliberately uncorrelated with transport state.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use herald_core::config::DeviceConfig;
use herald_protocol::DisplayEvent;

use crate::channels::{post_display_event, PowerCommand, POWER_CMDS, READINESS};

/// Hold time that forces the modem into shutdown
const POWER_OFF_HOLD_MS: u64 = 1500;

/// Power task - pulses the modem power key on request
#[embassy_executor::task]
pub async fn power_task(mut pwrkey: Output<'static>, config: &'static DeviceConfig) {
    info!("Power task started");

    // Cold boot: one pulse brings the modem up
    pulse(&mut pwrkey, u64::from(config.modem.pwrkey_pulse_ms)).await;
    READINESS.lock().await.modem_powered = true;
    post_display_event(DisplayEvent::ModemPowered);

    loop {
        match POWER_CMDS.receive().await {
            PowerCommand::Pulse => {
                pulse(&mut pwrkey, u64::from(config.modem.pwrkey_pulse_ms)).await;
                let mut flags = READINESS.lock().await;
                if flags.modem_powered {
                    // Pulsing a running modem shuts it down
                    flags.clear();
                    info!("modem powered down");
                } else {
                    flags.modem_powered = true;
                    drop(flags);
                    post_display_event(DisplayEvent::ModemPowered);
                    info!("modem powered up");
                }
            }
            PowerCommand::Off => {
                pulse(&mut pwrkey, POWER_OFF_HOLD_MS).await;
                READINESS.lock().await.clear();
                info!("modem powered off");
            }
        }
    }
}

async fn pulse(pwrkey: &mut Output<'static>, hold_ms: u64) {
    pwrkey.set_high();
    Timer::after_millis(hold_ms).await;
    pwrkey.set_low();
}
