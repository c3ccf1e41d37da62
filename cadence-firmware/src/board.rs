//! NUCLEO-F429ZI board bring-up
//!
//! Pin map:
//!
//! | Function     | Pin   | Notes                              |
//! |--------------|-------|------------------------------------|
//! | LED1 (green) | PB0   | gyroscope mode                     |
//! | LED2 (blue)  | PB7   | accelerometer mode, fault          |
//! | LED3 (red)   | PB14  | temperature mode                   |
//! | User button  | PC13  | active high, external pull-down    |
//! | USART3 TX    | PD8   | ST-LINK virtual COM port           |
//! | USART3 RX    | PD9   |                                    |
//! | I2C1 SCL     | PB6   | MPU6050                            |
//! | I2C1 SDA     | PB9   |                                    |

use cadence_core::config::{DebounceConfig, MeasureConfig};
use cadence_drivers::console::Console;
use cadence_drivers::indicator::LedBank;
use cadence_drivers::sensor::{AccelRange, GyroRange, Mpu6050, Mpu6050Config};
use cadence_hal::i2c::I2cConfig;
use cadence_hal::uart::UartConfig;
use cadence_hal_stm32f4::{i2c, uart, BlockingI2c, BlockingUart, Button, Led};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, Uart};

/// Values validated from board.toml at build time
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

/// USART peripheral number of the console
pub const CONSOLE_INSTANCE: u8 = 3;

/// Board LEDs
pub type Leds = LedBank<Led<'static>, Led<'static>, Led<'static>>;

/// Console on USART3
pub type BoardConsole = Console<BlockingUart<'static>>;

/// MPU6050 on I2C1
pub type BoardImu = Mpu6050<BlockingI2c<'static>>;

/// Peripherals after bring-up
pub struct Board {
    pub button: Button<'static>,
    pub leds: Leds,
    pub console: BoardConsole,
    pub imu: BoardImu,
}

/// Bring-up failures
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// USART rejected the requested frame format or baud rate
    Console(usart::ConfigError),
}

/// Button settle window
pub fn debounce_config() -> DebounceConfig {
    DebounceConfig {
        settle: generated::DEBOUNCE_SETTLE_MS,
    }
}

/// Sampling cadence per channel
pub fn measure_config() -> MeasureConfig {
    MeasureConfig {
        gyro_interval: generated::GYRO_INTERVAL_MS,
        accel_interval: generated::ACCEL_INTERVAL_MS,
        temp_interval: generated::TEMP_INTERVAL_MS,
    }
}

/// Console serial settings (8-O-1 at the configured baud rate)
pub fn console_config() -> UartConfig {
    UartConfig {
        baudrate: generated::CONSOLE_BAUDRATE,
        ..UartConfig::default()
    }
}

/// IMU address, ranges and output rate
pub fn imu_config() -> Mpu6050Config {
    Mpu6050Config {
        address: generated::IMU_ADDRESS,
        gyro_range: GyroRange::from_bits(generated::IMU_GYRO_RANGE).unwrap_or_default(),
        accel_range: AccelRange::from_bits(generated::IMU_ACCEL_RANGE).unwrap_or_default(),
        sample_rate_divider: generated::IMU_SAMPLE_RATE_DIVIDER,
    }
}

/// 168 MHz from the 8 MHz ST-LINK clock (HSE bypass)
pub fn clock_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Bypass,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}

impl Board {
    /// Initialize clocks and every peripheral the firmware uses
    ///
    /// LEDs come up first so a later failure can still show the fault
    /// pattern; the error carries them back for that purpose.
    pub fn init() -> Result<Self, (BoardError, Leds)> {
        let p = embassy_stm32::init(clock_config());

        let leds = LedBank::new(
            Led::new(Output::new(p.PB0, Level::Low, Speed::Low)),
            Led::new(Output::new(p.PB7, Level::Low, Speed::Low)),
            Led::new(Output::new(p.PB14, Level::Low, Speed::Low)),
        );

        let button = Button::new(Input::new(p.PC13, Pull::Down), false);

        let serial = console_config();
        let port = match Uart::new_blocking(
            p.USART3,
            p.PD9,
            p.PD8,
            uart::to_embassy_config(&serial),
        ) {
            Ok(port) => port,
            Err(e) => return Err((BoardError::Console(e), leds)),
        };
        let console = Console::new(BlockingUart::new(port, &serial));

        let bus = I2c::new_blocking(
            p.I2C1,
            p.PB6,
            p.PB9,
            i2c::to_embassy_config(&I2cConfig::STANDARD),
        );
        let imu = Mpu6050::new(BlockingI2c::new(bus), imu_config());

        Ok(Self {
            button,
            leds,
            console,
            imu,
        })
    }
}

/// Show the fault pattern and park the core
pub fn halt(leds: &mut Leds) -> ! {
    leds.fault();
    loop {
        cortex_m::asm::wfi();
    }
}
