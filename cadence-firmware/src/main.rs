//! Cadence - IMU console firmware
//!
//! Streams MPU6050 gyroscope, accelerometer or temperature readings to the
//! ST-LINK virtual COM port. The user button cycles through the channels
//! and the console keys `1`-`3` jump straight to one.
//!
//! Everything runs in a single cooperative superloop: nothing blocks on
//! time, every wait is a non-blocking tick delay polled each iteration.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use {defmt_rtt as _, panic_probe as _};

use cadence_firmware::board::{self, Board};
use cadence_firmware::controller::Controller;

/// Main entry point
#[entry]
fn main() -> ! {
    info!("Cadence firmware starting...");

    let board = match Board::init() {
        Ok(board) => board,
        Err((e, mut leds)) => {
            error!("Board init failed: {}", e);
            board::halt(&mut leds);
        }
    };
    info!("Peripherals initialized");

    let mut controller = match Controller::new(board) {
        Ok(controller) => controller,
        Err((e, mut leds)) => {
            error!("Invalid configuration: {}", e);
            board::halt(&mut leds);
        }
    };

    if let Err(e) = controller.start() {
        error!("Startup failed: {}", e);
        controller.halt();
    }
    info!("Menu ready, waiting for input");

    loop {
        controller.poll();
    }
}
