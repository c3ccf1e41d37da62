//! GPIO adapters for STM32F4

use cadence_hal::gpio::{InputPin, OutputPin};
use embassy_stm32::gpio::{Input, Output};

/// Push button input
///
/// `inverted` makes a pulled-up, active-low button read high while pressed.
pub struct Button<'d> {
    input: Input<'d>,
    inverted: bool,
}

impl<'d> Button<'d> {
    /// Wrap a configured input
    pub fn new(input: Input<'d>, inverted: bool) -> Self {
        Self { input, inverted }
    }
}

impl InputPin for Button<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high() != self.inverted
    }
}

/// Push-pull LED output
pub struct Led<'d> {
    output: Output<'d>,
}

impl<'d> Led<'d> {
    /// Wrap a configured output
    pub fn new(output: Output<'d>) -> Self {
        Self { output }
    }
}

impl OutputPin for Led<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }

    fn toggle(&mut self) {
        self.output.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.output.is_set_high()
    }
}
