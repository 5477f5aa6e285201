//! Modem engine task
//!
//! Owns the modem UART. Probes for the modem at startup, then loops
//! between two states: idle (waiting for a job or an unsolicited byte)
//! and running exactly one transaction. At most one job ever owns the
//! transport; everything else queues behind it.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUart;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use embedded_io_async::{Read, Write};

use herald_core::config::DeviceConfig;
use herald_core::modem::{
    classify, engine, EngineTransport, LineAssembler, RxEvent, TransportError, TIMEOUT_MARKER,
};
use herald_protocol::DisplayEvent;

use crate::channels::{post_display_event, MODEM_JOBS, READINESS, RESPONSE_ARENA};
use crate::modem_client::Events;

/// Pause after a UART read error before retrying
const READ_RETRY_MS: u64 = 50;

/// Modem engine task - serializes AT transactions over the modem UART
#[embassy_executor::task]
pub async fn modem_engine_task(mut uart: BufferedUart, config: &'static DeviceConfig) {
    info!("Modem engine task started");

    // Cold-boot settle, then the baud probe
    Timer::after_millis(u64::from(config.modem.settle_ms)).await;
    if probe(&mut uart, config).await {
        READINESS.lock().await.modem_ready = true;
        post_display_event(DisplayEvent::ModemReady);
        info!("Modem ready");
    } else {
        // Transactions will fail fast with a not-ready error
        warn!("Modem did not answer the AT probe");
    }

    let mut assembler = LineAssembler::new();
    loop {
        match select(MODEM_JOBS.receive(), read_byte(&mut uart)).await {
            Either::First(job) => {
                let mut transport = UartTransport {
                    uart: &mut uart,
                    deadline: Instant::now(),
                };
                let transcript = engine::run_job(&mut transport, &mut assembler, &job.kind).await;
                if transcript == TIMEOUT_MARKER {
                    warn!("job {} ended with no response", job.slot);
                }
                RESPONSE_ARENA.complete(job.slot, transcript);
            }
            Either::Second(byte) => {
                if let Some(line) = assembler.feed(byte) {
                    handle_unsolicited(&line).await;
                }
            }
        }
    }
}

/// The engine's transport: the modem UART plus the response window
struct UartTransport<'a> {
    uart: &'a mut BufferedUart,
    deadline: Instant,
}

impl EngineTransport for UartTransport<'_> {
    async fn transmit(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        debug!("TX {} bytes", bytes.len());
        self.uart.write_all(bytes).await.map_err(|e| {
            warn!("UART write error: {:?}", e);
            TransportError
        })
    }

    fn arm(&mut self, timeout_ms: u32) {
        self.deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
    }

    async fn receive(&mut self) -> RxEvent {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        match with_timeout(remaining, read_byte(self.uart)).await {
            Ok(byte) => RxEvent::Byte(byte),
            Err(_) => RxEvent::Elapsed,
        }
    }
}

/// Startup AT probe across the configured baud table
async fn probe(uart: &mut BufferedUart, config: &DeviceConfig) -> bool {
    for &baud in config.modem.bauds.iter() {
        uart.set_baudrate(baud);
        debug!("probing at {} baud", baud);
        for _ in 0..config.modem.probe_attempts {
            if let Err(e) = uart.write_all(b"AT\r\n").await {
                warn!("UART write error: {:?}", e);
                continue;
            }
            if wait_for_ok(uart, config.modem.probe_timeout_ms).await {
                info!("modem answered at {} baud", baud);
                return true;
            }
        }
    }
    false
}

/// Collect lines until `OK` or the probe window closes
async fn wait_for_ok(uart: &mut BufferedUart, timeout_ms: u32) -> bool {
    let mut assembler = LineAssembler::new();
    let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match with_timeout(remaining, read_byte(uart)).await {
            Ok(byte) => {
                if let Some(line) = assembler.feed(byte) {
                    if line.trim() == "OK" {
                        return true;
                    }
                }
            }
            Err(_) => return false,
        }
    }
}

/// Next byte from the transport; read errors back off and retry
async fn read_byte(uart: &mut BufferedUart) -> u8 {
    let mut buf = [0u8; 1];
    loop {
        match uart.read(&mut buf).await {
            Ok(n) if n > 0 => return buf[0],
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                Timer::after_millis(READ_RETRY_MS).await;
            }
        }
    }
}

/// Scan a line received outside any transaction
async fn handle_unsolicited(line: &str) {
    match classify(line) {
        Some(urc) => {
            debug!("URC: {:?}", urc);
            READINESS.lock().await.apply_urc(urc, &Events);
        }
        None => {
            debug!("unsolicited line dropped: {}", line);
        }
    }
}
