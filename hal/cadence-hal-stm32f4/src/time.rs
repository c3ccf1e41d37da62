//! Millisecond tick source
//!
//! Backed by the embassy time driver, which runs from a hardware timer
//! started by `embassy_stm32::init`.

use cadence_hal::time::{Tick, TickSource};
use embassy_time::Instant;

/// Milliseconds since boot, wrapping at `u32::MAX`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTick;

impl TickSource for SystemTick {
    fn now(&self) -> Tick {
        Instant::now().as_millis() as Tick
    }
}
