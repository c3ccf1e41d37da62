//! MPU6050 six-axis IMU (I2C)
//!
//! Gyroscope, accelerometer and die temperature over a register interface.
//!
//! # Register access
//!
//! Every register is 8 bits wide. A read is a write of the register address
//! followed by a repeated-start read; consecutive registers auto-increment,
//! so the three 16-bit axis words are fetched in one 6-byte burst. Output
//! words are big-endian two's complement (high byte at the lower address).

use cadence_core::traits::{Axes, ImuSensor, SensorError};
use cadence_hal::i2c::I2cBus;

/// MPU6050 register addresses
pub mod reg {
    /// Sample rate divider (rate = 8 kHz / (1 + div))
    pub const SMPLRT_DIV: u8 = 0x19;
    /// Gyroscope full-scale range (bits 4:3)
    pub const GYRO_CONFIG: u8 = 0x1B;
    /// Accelerometer full-scale range (bits 4:3)
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const ACCEL_XOUT_L: u8 = 0x3C;
    pub const ACCEL_YOUT_H: u8 = 0x3D;
    pub const ACCEL_YOUT_L: u8 = 0x3E;
    pub const ACCEL_ZOUT_H: u8 = 0x3F;
    pub const ACCEL_ZOUT_L: u8 = 0x40;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const TEMP_OUT_L: u8 = 0x42;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const GYRO_XOUT_L: u8 = 0x44;
    pub const GYRO_YOUT_H: u8 = 0x45;
    pub const GYRO_YOUT_L: u8 = 0x46;
    pub const GYRO_ZOUT_H: u8 = 0x47;
    pub const GYRO_ZOUT_L: u8 = 0x48;
    /// Power management (clock source, sleep)
    pub const PWR_MGMT_1: u8 = 0x6B;
    /// Device identity
    pub const WHO_AM_I: u8 = 0x75;
}

/// 7-bit address with AD0 low
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// 7-bit address with AD0 high
pub const ALT_ADDRESS: u8 = 0x69;

/// Expected `WHO_AM_I` contents
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Internal 8 MHz oscillator, sleep disabled
const PWR_INTERNAL_OSC: u8 = 0x00;

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 °/s
    #[default]
    Dps250,
    /// ±500 °/s
    Dps500,
    /// ±1000 °/s
    Dps1000,
    /// ±2000 °/s
    Dps2000,
}

impl GyroRange {
    /// FS_SEL field value
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Parse an FS_SEL field value
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(GyroRange::Dps250),
            1 => Some(GyroRange::Dps500),
            2 => Some(GyroRange::Dps1000),
            3 => Some(GyroRange::Dps2000),
            _ => None,
        }
    }

    /// LSB per °/s
    pub fn sensitivity(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// AFS_SEL field value
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Parse an AFS_SEL field value
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(AccelRange::G2),
            1 => Some(AccelRange::G4),
            2 => Some(AccelRange::G8),
            3 => Some(AccelRange::G16),
            _ => None,
        }
    }

    /// LSB per g
    pub fn sensitivity(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// MPU6050 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mpu6050Config {
    /// 7-bit bus address
    pub address: u8,
    pub gyro_range: GyroRange,
    pub accel_range: AccelRange,
    /// SMPLRT_DIV value (7 gives 1 kHz with the gyro at 8 kHz)
    pub sample_rate_divider: u8,
}

impl Default for Mpu6050Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            gyro_range: GyroRange::Dps250,
            accel_range: AccelRange::G2,
            sample_rate_divider: 7,
        }
    }
}

/// MPU6050 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu6050Error<E> {
    /// Underlying bus failure
    Bus(E),
    /// `WHO_AM_I` returned something other than the MPU6050 identity
    WrongIdentity(u8),
    /// Measurement requested before [`Mpu6050::init`] succeeded
    NotInitialized,
}

impl<E> From<Mpu6050Error<E>> for SensorError {
    fn from(err: Mpu6050Error<E>) -> Self {
        match err {
            Mpu6050Error::Bus(_) => SensorError::Bus,
            Mpu6050Error::WrongIdentity(_) => SensorError::NotDetected,
            Mpu6050Error::NotInitialized => SensorError::NotInitialized,
        }
    }
}

/// MPU6050 on an I2C bus
pub struct Mpu6050<I2C> {
    i2c: I2C,
    config: Mpu6050Config,
    initialized: bool,
}

impl<I2C: I2cBus> Mpu6050<I2C> {
    /// Create a driver; nothing is sent until [`init`](Self::init)
    pub fn new(i2c: I2C, config: Mpu6050Config) -> Self {
        Self {
            i2c,
            config,
            initialized: false,
        }
    }

    /// Wake the device, program rate and ranges, then verify identity
    pub fn init(&mut self) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.initialized = false;

        self.write_register(reg::PWR_MGMT_1, PWR_INTERNAL_OSC)?;
        self.write_register(reg::SMPLRT_DIV, self.config.sample_rate_divider)?;
        self.write_register(reg::GYRO_CONFIG, self.config.gyro_range.bits() << 3)?;
        self.write_register(reg::ACCEL_CONFIG, self.config.accel_range.bits() << 3)?;

        let id = self.read_register(reg::WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            return Err(Mpu6050Error::WrongIdentity(id));
        }

        self.initialized = true;
        Ok(())
    }

    /// Whether [`init`](Self::init) has succeeded
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Active configuration
    pub fn config(&self) -> &Mpu6050Config {
        &self.config
    }

    /// Read one 8-bit register
    pub fn read_register(&mut self, register: u8) -> Result<u8, Mpu6050Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.config.address, &[register], &mut buf)
            .map_err(Mpu6050Error::Bus)?;
        Ok(buf[0])
    }

    /// Write one 8-bit register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.i2c
            .write(self.config.address, &[register, value])
            .map_err(Mpu6050Error::Bus)
    }

    /// Burst-read consecutive registers starting at `register`
    pub fn read_registers(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.i2c
            .write_read(self.config.address, &[register], buf)
            .map_err(Mpu6050Error::Bus)
    }

    /// Raw gyroscope words (X, Y, Z)
    pub fn read_gyro_raw(&mut self) -> Result<[i16; 3], Mpu6050Error<I2C::Error>> {
        self.read_triplet(reg::GYRO_XOUT_H)
    }

    /// Raw accelerometer words (X, Y, Z)
    pub fn read_accel_raw(&mut self) -> Result<[i16; 3], Mpu6050Error<I2C::Error>> {
        self.read_triplet(reg::ACCEL_XOUT_H)
    }

    /// Raw temperature word
    pub fn read_temperature_raw(&mut self) -> Result<i16, Mpu6050Error<I2C::Error>> {
        self.ensure_initialized()?;
        let mut buf = [0u8; 2];
        self.read_registers(reg::TEMP_OUT_H, &mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Angular rate in °/s
    pub fn gyro(&mut self) -> Result<Axes, Mpu6050Error<I2C::Error>> {
        let raw = self.read_gyro_raw()?;
        Ok(scale(raw, self.config.gyro_range.sensitivity()))
    }

    /// Acceleration in g
    pub fn accel(&mut self) -> Result<Axes, Mpu6050Error<I2C::Error>> {
        let raw = self.read_accel_raw()?;
        Ok(scale(raw, self.config.accel_range.sensitivity()))
    }

    /// Die temperature in °C
    pub fn temperature(&mut self) -> Result<f32, Mpu6050Error<I2C::Error>> {
        let raw = self.read_temperature_raw()?;
        Ok(temperature_from_raw(raw))
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn ensure_initialized(&self) -> Result<(), Mpu6050Error<I2C::Error>> {
        if self.initialized {
            Ok(())
        } else {
            Err(Mpu6050Error::NotInitialized)
        }
    }

    fn read_triplet(&mut self, first: u8) -> Result<[i16; 3], Mpu6050Error<I2C::Error>> {
        self.ensure_initialized()?;
        let mut buf = [0u8; 6];
        self.read_registers(first, &mut buf)?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}

impl<I2C: I2cBus> ImuSensor for Mpu6050<I2C> {
    fn read_gyro(&mut self) -> Result<Axes, SensorError> {
        self.gyro().map_err(SensorError::from)
    }

    fn read_accel(&mut self) -> Result<Axes, SensorError> {
        self.accel().map_err(SensorError::from)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature().map_err(SensorError::from)
    }
}

/// Datasheet transfer function: `raw / 340 + 36.53`
pub fn temperature_from_raw(raw: i16) -> f32 {
    raw as f32 / 340.0 + 36.53
}

fn scale(raw: [i16; 3], sensitivity: f32) -> Axes {
    Axes::new(
        raw[0] as f32 / sensitivity,
        raw[1] as f32 / sensitivity,
        raw[2] as f32 / sensitivity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    /// Register-file model of the device
    struct MockBus {
        regs: [u8; 128],
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            let mut regs = [0u8; 128];
            regs[reg::WHO_AM_I as usize] = WHO_AM_I_VALUE;
            // Device powers up asleep
            regs[reg::PWR_MGMT_1 as usize] = 0x40;
            Self {
                regs,
                writes: Vec::new(),
                fail: false,
            }
        }

        fn set_word(&mut self, high: u8, value: i16) {
            let [h, l] = value.to_be_bytes();
            self.regs[high as usize] = h;
            self.regs[high as usize + 1] = l;
        }
    }

    impl I2cBus for MockBus {
        type Error = Nack;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(Nack);
            }
            let (register, value) = (data[0], data[1]);
            self.regs[register as usize] = value;
            self.writes.push((register, value));
            Ok(())
        }

        fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), Nack> {
            Err(Nack)
        }

        fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Nack> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(Nack);
            }
            let start = write[0] as usize;
            read.copy_from_slice(&self.regs[start..start + read.len()]);
            Ok(())
        }
    }

    fn ready(bus: MockBus, config: Mpu6050Config) -> Mpu6050<MockBus> {
        let mut imu = Mpu6050::new(bus, config);
        imu.init().unwrap();
        imu
    }

    #[test]
    fn test_init_sequence() {
        let config = Mpu6050Config {
            gyro_range: GyroRange::Dps1000,
            accel_range: AccelRange::G4,
            ..Mpu6050Config::default()
        };
        let imu = ready(MockBus::new(), config);
        assert!(imu.is_initialized());

        let bus = imu.release();
        assert_eq!(
            bus.writes,
            vec![
                (reg::PWR_MGMT_1, 0x00),
                (reg::SMPLRT_DIV, 7),
                (reg::GYRO_CONFIG, 2 << 3),
                (reg::ACCEL_CONFIG, 1 << 3),
            ]
        );
    }

    #[test]
    fn test_init_rejects_wrong_identity() {
        let mut bus = MockBus::new();
        bus.regs[reg::WHO_AM_I as usize] = 0x72;
        let mut imu = Mpu6050::new(bus, Mpu6050Config::default());
        assert_eq!(imu.init(), Err(Mpu6050Error::WrongIdentity(0x72)));
        assert!(!imu.is_initialized());
    }

    #[test]
    fn test_init_bus_failure() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let mut imu = Mpu6050::new(bus, Mpu6050Config::default());
        assert_eq!(imu.init(), Err(Mpu6050Error::Bus(Nack)));
    }

    #[test]
    fn test_wrong_address_fails() {
        let config = Mpu6050Config {
            address: ALT_ADDRESS,
            ..Mpu6050Config::default()
        };
        let mut imu = Mpu6050::new(MockBus::new(), config);
        assert!(matches!(imu.init(), Err(Mpu6050Error::Bus(_))));
    }

    #[test]
    fn test_reads_require_init() {
        let mut imu = Mpu6050::new(MockBus::new(), Mpu6050Config::default());
        assert_eq!(imu.gyro(), Err(Mpu6050Error::NotInitialized));
        assert_eq!(imu.read_temperature(), Err(SensorError::NotInitialized));
    }

    #[test]
    fn test_gyro_scaling() {
        let mut bus = MockBus::new();
        bus.set_word(reg::GYRO_XOUT_H, 131);
        bus.set_word(reg::GYRO_YOUT_H, -262);
        bus.set_word(reg::GYRO_ZOUT_H, 0);
        let mut imu = ready(bus, Mpu6050Config::default());

        let g = imu.read_gyro().unwrap();
        assert!((g.x - 1.0).abs() < 1e-6);
        assert!((g.y + 2.0).abs() < 1e-6);
        assert_eq!(g.z, 0.0);
    }

    #[test]
    fn test_accel_scaling_per_range() {
        let mut bus = MockBus::new();
        bus.set_word(reg::ACCEL_XOUT_H, 8192);
        bus.set_word(reg::ACCEL_YOUT_H, -8192);
        bus.set_word(reg::ACCEL_ZOUT_H, 16384);
        let config = Mpu6050Config {
            accel_range: AccelRange::G4,
            ..Mpu6050Config::default()
        };
        let mut imu = ready(bus, config);

        let a = imu.read_accel().unwrap();
        assert!((a.x - 1.0).abs() < 1e-6);
        assert!((a.y + 1.0).abs() < 1e-6);
        assert!((a.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_low_byte_not_sign_extended() {
        // 0x00FF must read as +255, not -1
        let mut bus = MockBus::new();
        bus.regs[reg::GYRO_XOUT_H as usize] = 0x00;
        bus.regs[reg::GYRO_XOUT_L as usize] = 0xFF;
        let mut imu = ready(bus, Mpu6050Config::default());
        assert_eq!(imu.read_gyro_raw().unwrap()[0], 255);
    }

    #[test]
    fn test_temperature() {
        let mut bus = MockBus::new();
        bus.set_word(reg::TEMP_OUT_H, -340);
        let mut imu = ready(bus, Mpu6050Config::default());
        let t = imu.read_temperature().unwrap();
        assert!((t - 35.53).abs() < 1e-4);
        assert!((temperature_from_raw(0) - 36.53).abs() < 1e-6);
    }

    #[test]
    fn test_register_access() {
        let mut imu = Mpu6050::new(MockBus::new(), Mpu6050Config::default());
        imu.write_register(reg::SMPLRT_DIV, 3).unwrap();
        assert_eq!(imu.read_register(reg::SMPLRT_DIV), Ok(3));
        assert_eq!(imu.read_register(reg::WHO_AM_I), Ok(WHO_AM_I_VALUE));
    }

    #[test]
    fn test_range_bits() {
        for bits in 0..4 {
            assert_eq!(GyroRange::from_bits(bits).unwrap().bits(), bits);
            assert_eq!(AccelRange::from_bits(bits).unwrap().bits(), bits);
        }
        assert_eq!(GyroRange::from_bits(4), None);
        assert_eq!(AccelRange::from_bits(9), None);
    }
}
