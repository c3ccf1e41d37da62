//! Inertial measurement unit trait

/// Errors that can occur while reading an IMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, timeout, arbitration loss)
    Bus,
    /// Identity register did not match the expected device
    NotDetected,
    /// Read attempted before successful initialization
    NotInitialized,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::Bus => write!(f, "sensor bus error"),
            SensorError::NotDetected => write!(f, "sensor not detected"),
            SensorError::NotInitialized => write!(f, "sensor not initialized"),
        }
    }
}

/// Three-axis reading in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Axes {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Trait for six-axis IMUs with an on-die temperature sensor
///
/// Reads take `&mut self` because every sample is a bus transaction.
pub trait ImuSensor {
    /// Angular rate in degrees per second
    fn read_gyro(&mut self) -> Result<Axes, SensorError>;

    /// Acceleration in g
    fn read_accel(&mut self) -> Result<Axes, SensorError>;

    /// Die temperature in degrees Celsius
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}
