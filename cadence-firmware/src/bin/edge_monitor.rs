//! Cadence edge monitor
//!
//! Bring-up check for the button path: every debounced press toggles LED1
//! and every release toggles LED2, each reported on the console.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use {defmt_rtt as _, panic_probe as _};

use cadence_core::debounce::Debouncer;
use cadence_firmware::board::{self, Board};
use cadence_hal_stm32f4::SystemTick;

#[entry]
fn main() -> ! {
    info!("Cadence edge monitor starting...");

    let Board {
        button,
        mut leds,
        mut console,
        ..
    } = match Board::init() {
        Ok(board) => board,
        Err((e, mut leds)) => {
            error!("Board init failed: {}", e);
            board::halt(&mut leds);
        }
    };

    let mut button = match Debouncer::new(button, board::debounce_config().settle) {
        Ok(button) => button,
        Err(e) => {
            error!("Invalid settle time: {}", e);
            board::halt(&mut leds);
        }
    };

    if let Err(e) = console.print_banner(board::CONSOLE_INSTANCE, &board::console_config()) {
        error!("Console write failed: {}", e);
        board::halt(&mut leds);
    }

    let clock = SystemTick;
    loop {
        button.update(&clock);

        if button.read_falling_edge() {
            leds.toggle_led1();
            if let Err(e) = console.send_str("Falling edge detected.\n\r") {
                warn!("Console write failed: {}", e);
            }
        }

        if button.read_rising_edge() {
            leds.toggle_led2();
            if let Err(e) = console.send_str("Rising edge detected.\n\r") {
                warn!("Console write failed: {}", e);
            }
        }
    }
}
