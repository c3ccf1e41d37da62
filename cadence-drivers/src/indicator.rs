//! Three-LED mode indicator
//!
//! One LED per measurement channel. The fault pattern lights LED2 alone.

use cadence_core::state::IndicatorPattern;
use cadence_hal::gpio::OutputPin;

/// Board LEDs driven as a group
pub struct LedBank<A, B, C> {
    led1: A,
    led2: B,
    led3: C,
}

impl<A: OutputPin, B: OutputPin, C: OutputPin> LedBank<A, B, C> {
    /// Take the LEDs and switch them all off
    pub fn new(led1: A, led2: B, led3: C) -> Self {
        let mut bank = Self { led1, led2, led3 };
        bank.show(IndicatorPattern::OFF);
        bank
    }

    /// Drive all three LEDs to the pattern
    pub fn show(&mut self, pattern: IndicatorPattern) {
        self.led1.set_state(pattern.led1);
        self.led2.set_state(pattern.led2);
        self.led3.set_state(pattern.led3);
    }

    /// Show the fault pattern
    pub fn fault(&mut self) {
        self.show(IndicatorPattern::FAULT);
    }

    /// Pattern currently driven on the pins
    pub fn current(&self) -> IndicatorPattern {
        IndicatorPattern {
            led1: self.led1.is_set_high(),
            led2: self.led2.is_set_high(),
            led3: self.led3.is_set_high(),
        }
    }

    /// Toggle LED1 only
    pub fn toggle_led1(&mut self) {
        self.led1.toggle();
    }

    /// Toggle LED2 only
    pub fn toggle_led2(&mut self) {
        self.led2.toggle();
    }

    /// Toggle LED3 only
    pub fn toggle_led3(&mut self) {
        self.led3.toggle();
    }

    /// Release the pins
    pub fn release(self) -> (A, B, C) {
        (self.led1, self.led2, self.led3)
    }
}
