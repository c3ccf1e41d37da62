//! Non-blocking delay
//!
//! A [`Delay`] answers "have at least N ticks passed since I was armed?"
//! without ever blocking. [`Delay::poll`] both starts an idle delay and
//! checks an armed one, so a superloop can call it unconditionally on every
//! iteration:
//!
//! ```text
//! idle ──poll──▶ armed(start = now) ──poll, elapsed──▶ idle (returns true)
//!                  │  ▲
//!                  └──┘ poll, not elapsed (returns false)
//! ```

use cadence_hal::time::{self, Tick, TickSource};

/// Exclusive upper bound for a delay duration, in ticks
pub const MAX_DELAY: Tick = 30_000;

/// Invalid delay configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Duration of zero ticks
    ZeroDuration,
    /// Duration at or above [`MAX_DELAY`]
    DurationTooLong {
        /// Requested duration
        duration: Tick,
        /// Exclusive limit
        max: Tick,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroDuration => write!(f, "delay duration must be positive"),
            ConfigError::DurationTooLong { duration, max } => {
                write!(f, "delay duration {} must be below {}", duration, max)
            }
        }
    }
}

/// Check a duration against `0 < duration < MAX_DELAY`
pub const fn validate_duration(duration: Tick) -> Result<Tick, ConfigError> {
    if duration == 0 {
        return Err(ConfigError::ZeroDuration);
    }
    if duration >= MAX_DELAY {
        return Err(ConfigError::DurationTooLong {
            duration,
            max: MAX_DELAY,
        });
    }
    Ok(duration)
}

/// Single-interval, self-rearming delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Delay {
    /// Tick captured when the delay was armed (0 while idle)
    start_tick: Tick,
    /// Interval length in ticks
    duration: Tick,
    /// Armed vs idle
    running: bool,
}

impl Delay {
    /// Create an idle delay
    ///
    /// Fails with [`ConfigError`] unless `0 < duration < MAX_DELAY`.
    pub const fn new(duration: Tick) -> Result<Self, ConfigError> {
        match validate_duration(duration) {
            Ok(duration) => Ok(Self {
                start_tick: 0,
                duration,
                running: false,
            }),
            Err(e) => Err(e),
        }
    }

    /// Arm if idle, otherwise report whether the interval has elapsed
    ///
    /// Returns `true` exactly once per armed interval; the delay is idle
    /// afterwards and re-arms on the next call.
    pub fn poll<C: TickSource + ?Sized>(&mut self, clock: &C) -> bool {
        self.poll_at(clock.now())
    }

    /// [`poll`](Self::poll) against an explicit tick value
    pub fn poll_at(&mut self, now: Tick) -> bool {
        if !self.running {
            self.start_tick = now;
            self.running = true;
            return false;
        }

        if time::elapsed(self.start_tick, now) >= self.duration {
            self.running = false;
            self.start_tick = 0;
            return true;
        }

        false
    }

    /// Change the interval length
    ///
    /// An armed delay keeps its start tick; the next poll compares against
    /// the new duration.
    pub fn rewrite(&mut self, duration: Tick) -> Result<(), ConfigError> {
        self.duration = validate_duration(duration)?;
        Ok(())
    }

    /// Return to idle without touching the duration
    pub fn reset(&mut self) {
        self.running = false;
        self.start_tick = 0;
    }

    /// Configured interval length
    pub fn duration(&self) -> Tick {
        self.duration
    }

    /// Whether the delay is armed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick captured at the last arm (0 while idle)
    pub fn start_tick(&self) -> Tick {
        self.start_tick
    }

}
