//! Interpreter-facing modem access
//!
//! Implements the core [`ModemControl`] seam over the engine's work
//! queue and the response slot arena. Every transaction waits with the
//! request's own budget plus a margin; if even that expires the slot is
//! retired so the engine's eventual completion lands nowhere.

use defmt::*;
use embassy_time::{with_timeout, Duration, Timer};
use heapless::Vec;

use herald_core::config::DeviceConfig;
use herald_core::error::ModemError;
use herald_core::modem::{
    backstop_ms, cmgs_command, gnss, transcript_ok, AtRequest, JobKind, Transcript, Urc, CTRL_Z,
    RAW_PAYLOAD_MAX, TIMEOUT_MARKER,
};
use herald_core::readiness::ReadinessFlags;
use herald_core::traits::{EventSink, ModemControl};
use herald_protocol::DisplayEvent;

use crate::channels::{
    post_display_event, EngineJob, PowerCommand, MODEM_JOBS, POWER_CMDS, READINESS, RESPONSE_ARENA,
};

/// Handle the keyboard task talks to the modem through
pub struct ModemClient {
    config: &'static DeviceConfig,
}

impl ModemClient {
    pub fn new(config: &'static DeviceConfig) -> Self {
        Self { config }
    }

    /// Queue one job and wait for its transcript
    async fn submit(&self, kind: JobKind, timeout_ms: u32) -> Result<Transcript, ModemError> {
        let Some(slot) = RESPONSE_ARENA.acquire() else {
            return Err(ModemError::Busy);
        };
        if MODEM_JOBS.try_send(EngineJob { kind, slot }).is_err() {
            RESPONSE_ARENA.release(slot);
            return Err(ModemError::Busy);
        }

        let budget = Duration::from_millis(u64::from(backstop_ms(timeout_ms)));
        match with_timeout(budget, RESPONSE_ARENA.wait(slot)).await {
            Ok(transcript) => {
                RESPONSE_ARENA.release(slot);
                if transcript == TIMEOUT_MARKER {
                    return Err(ModemError::Timeout);
                }
                Ok(transcript)
            }
            Err(_) => {
                // The engine may still complete the slot later; retired
                // slots never recirculate, so that lands nowhere
                warn!("response slot {} abandoned", slot);
                RESPONSE_ARENA.retire(slot);
                Err(ModemError::Timeout)
            }
        }
    }

    async fn transact(&self, request: AtRequest) -> Result<Transcript, ModemError> {
        let timeout_ms = request.timeout_ms;
        let transcript = self.submit(JobKind::At(request), timeout_ms).await?;
        if transcript_ok(&transcript) {
            Ok(transcript)
        } else {
            Err(ModemError::Protocol(transcript))
        }
    }

    async fn ensure_ready(&self) -> Result<(), ModemError> {
        if READINESS.lock().await.modem_ready {
            Ok(())
        } else {
            Err(ModemError::NotReady)
        }
    }
}

impl ModemControl for ModemClient {
    async fn send_at(&self, command: &str, timeout_ms: u32) -> Result<Transcript, ModemError> {
        self.ensure_ready().await?;
        self.transact(AtRequest::new(command, timeout_ms)?).await
    }

    async fn send_sms(&self, number: &str, body: &str) -> Result<(), ModemError> {
        self.ensure_ready().await?;
        let timeout_ms = self.config.modem.sms_timeout_ms;

        // Open the send; the modem answers with the `>` payload prompt
        let open = AtRequest::new(&cmgs_command(number)?, timeout_ms)?;
        self.transact(open).await?;

        // Body, Ctrl-Z terminated, then the final status
        let mut payload: Vec<u8, RAW_PAYLOAD_MAX> = Vec::new();
        payload
            .extend_from_slice(body.as_bytes())
            .map_err(|_| ModemError::Invalid)?;
        payload.push(CTRL_Z).map_err(|_| ModemError::Invalid)?;

        let transcript = self
            .submit(JobKind::Raw { payload, timeout_ms }, timeout_ms)
            .await?;
        if transcript_ok(&transcript) {
            Ok(())
        } else {
            Err(ModemError::Protocol(transcript))
        }
    }

    async fn gnss_read(&self) -> Result<Transcript, ModemError> {
        self.ensure_ready().await?;
        let timeout_ms = self.config.modem.gnss_timeout_ms;
        self.transact(AtRequest::new(gnss::GNSS_POWER_ON, timeout_ms)?)
            .await?;
        // Give the GNSS engine a moment before asking for a fix
        Timer::after_millis(u64::from(self.config.modem.gnss_fix_delay_ms)).await;
        self.transact(AtRequest::new(gnss::GNSS_INFO, timeout_ms)?)
            .await
    }

    async fn toggle_power(&self) {
        POWER_CMDS.send(PowerCommand::Pulse).await;
    }

    async fn power_off(&self) {
        POWER_CMDS.send(PowerCommand::Off).await;
    }

    async fn readiness(&self) -> ReadinessFlags {
        *READINESS.lock().await
    }

    async fn mark_sms_read(&self) {
        READINESS.lock().await.sms_pending = 0;
    }

    async fn note_network_registered(&self) {
        READINESS
            .lock()
            .await
            .apply_urc(Urc::NetworkRegistered, &Events);
    }
}

/// Display event sink backed by the static event channel
pub struct Events;

impl EventSink for Events {
    fn post(&self, event: DisplayEvent) {
        post_display_event(event);
    }
}
