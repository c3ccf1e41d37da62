//! Measurement sequencer
//!
//! Runs once per superloop iteration. Each streaming mode owns a [`Delay`];
//! when the current mode's delay elapses its channel is due for a sample.
//! User events are applied after sampling, so a press in the same iteration
//! as a due sample still lets that sample go out first.

use cadence_hal::time::{Tick, TickSource};

use crate::config::MeasureConfig;
use crate::delay::{ConfigError, Delay};
use crate::state::{Channel, Event, Mode};

/// Outcome of one sequencer iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Channel to read and print this iteration
    pub sample: Option<Channel>,
    /// New mode, if an event changed it
    pub switched_to: Option<Mode>,
}

/// Drives the measurement menu
#[derive(Debug, Clone)]
pub struct Sequencer {
    mode: Mode,
    gyro: Delay,
    accel: Delay,
    temp: Delay,
}

impl Sequencer {
    /// Create a sequencer in [`Mode::Start`]
    pub fn new(config: &MeasureConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            mode: Mode::Start,
            gyro: Delay::new(config.gyro_interval)?,
            accel: Delay::new(config.accel_interval)?,
            temp: Delay::new(config.temp_interval)?,
        })
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sampling interval of a channel
    pub fn interval(&self, channel: Channel) -> Tick {
        self.timer(channel).duration()
    }

    /// Change a channel's sampling interval
    ///
    /// Takes effect on the next poll; an interval already in progress keeps
    /// its start tick.
    pub fn set_interval(&mut self, channel: Channel, ticks: Tick) -> Result<(), ConfigError> {
        self.timer_mut(channel).rewrite(ticks)
    }

    /// Run one iteration
    pub fn update<C: TickSource + ?Sized>(&mut self, clock: &C, event: Option<Event>) -> Step {
        let mut step = Step::default();

        if let Some(channel) = self.mode.channel() {
            if self.timer_mut(channel).poll(clock) {
                step.sample = Some(channel);
            }
        }

        if let Some(event) = event {
            let next = self.mode.transition(event);
            if next != self.mode {
                self.enter(next);
                step.switched_to = Some(next);
            }
        }

        step
    }

    /// Switch mode directly
    ///
    /// The entered mode's interval restarts from its next poll.
    pub fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        if let Some(channel) = mode.channel() {
            self.timer_mut(channel).reset();
        }
    }

    fn timer(&self, channel: Channel) -> &Delay {
        match channel {
            Channel::Gyro => &self.gyro,
            Channel::Accel => &self.accel,
            Channel::Temp => &self.temp,
        }
    }

    fn timer_mut(&mut self, channel: Channel) -> &mut Delay {
        match channel {
            Channel::Gyro => &mut self.gyro,
            Channel::Accel => &mut self.accel,
            Channel::Temp => &mut self.temp,
        }
    }
}
