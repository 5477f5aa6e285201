//! Herald - Pocket Communicator Firmware
//!
//! Main firmware binary for RP2040-based boards: an I2C keyboard, an
//! e-paper display, and a cellular modem on a buffered UART, glued
//! together by the keyboard -> interpreter -> modem engine pipeline.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use herald_core::config::DeviceConfig;

mod channels;
mod modem_client;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Device configuration (must live forever for task references)
static DEVICE_CONFIG: StaticCell<DeviceConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Herald firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static DeviceConfig = DEVICE_CONFIG.init(DeviceConfig::default());

    // Response slots must all be free before any caller runs
    channels::seed_response_slots();

    // Modem UART
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.modem.bauds.first().copied().unwrap_or(115_200);

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("UART initialized for modem communication");

    // Keyboard I2C bus
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    info!("I2C initialized for keyboard");

    // Modem power key
    let pwrkey = Output::new(p.PIN_14, Level::Low);

    spawner.spawn(tasks::power_task(pwrkey, config)).unwrap();
    spawner.spawn(tasks::modem_engine_task(uart, config)).unwrap();
    spawner.spawn(tasks::keyboard_task(i2c, config)).unwrap();
    spawner.spawn(tasks::display_task()).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
