//! Configuration type definitions

use cadence_hal::time::Tick;

use crate::delay::{validate_duration, ConfigError};

pub use crate::delay::MAX_DELAY;

/// Default settle window for button debouncing (ticks)
pub const DEBOUNCE_DELAY: Tick = 40;

/// Default interval between gyroscope samples (ticks)
pub const GYRO_INTERVAL: Tick = 100;

/// Default interval between accelerometer samples (ticks)
pub const ACCEL_INTERVAL: Tick = 100;

/// Default interval between temperature samples (ticks)
pub const TEMP_INTERVAL: Tick = 100;

/// Button debounce configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Minimum stable time before an edge is accepted
    pub settle: Tick,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            settle: DEBOUNCE_DELAY,
        }
    }
}

impl DebounceConfig {
    /// Check the settle window against the delay limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_duration(self.settle).map(|_| ())
    }
}

/// Sampling cadence of the measurement menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasureConfig {
    /// Ticks between gyroscope samples
    pub gyro_interval: Tick,
    /// Ticks between accelerometer samples
    pub accel_interval: Tick,
    /// Ticks between temperature samples
    pub temp_interval: Tick,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            gyro_interval: GYRO_INTERVAL,
            accel_interval: ACCEL_INTERVAL,
            temp_interval: TEMP_INTERVAL,
        }
    }
}

impl MeasureConfig {
    /// Check every interval against the delay limits
    ///
    /// Returns the first invalid interval's error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_duration(self.gyro_interval)?;
        validate_duration(self.accel_interval)?;
        validate_duration(self.temp_interval)?;
        Ok(())
    }
}
