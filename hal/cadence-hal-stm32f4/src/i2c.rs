//! I2C bus driver for STM32F4
//!
//! Blocking master transfers for the IMU.

use cadence_hal::i2c::{I2cBus, I2cConfig};
use embassy_stm32::i2c::{self, Error as I2cError, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_stm32::time::Hertz;
use embassy_time::Duration;

/// Convert board settings to the embassy peripheral config
pub fn to_embassy_config(config: &I2cConfig) -> i2c::Config {
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz(config.frequency);
    i2c_config.timeout = Duration::from_millis(config.timeout_ms as u64);
    i2c_config
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Timeout
    Timeout,
    /// CRC error
    Crc,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<I2cError> for I2cBusError {
    fn from(e: I2cError) -> Self {
        match e {
            I2cError::Bus => I2cBusError::Bus,
            I2cError::Arbitration => I2cBusError::ArbitrationLost,
            I2cError::Nack => I2cBusError::Nack,
            I2cError::Timeout => I2cBusError::Timeout,
            I2cError::Crc => I2cBusError::Crc,
            I2cError::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

/// Blocking I2C master
pub struct BlockingI2c<'d> {
    i2c: I2c<'d, Blocking, Master>,
}

impl<'d> BlockingI2c<'d> {
    /// Wrap a peripheral created with `I2c::new_blocking`
    pub fn new(i2c: I2c<'d, Blocking, Master>) -> Self {
        Self { i2c }
    }
}

impl I2cBus for BlockingI2c<'_> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.blocking_write(address, data)?;
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.blocking_read(address, buf)?;
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.blocking_write_read(address, write_data, read_buf)?;
        Ok(())
    }
}
