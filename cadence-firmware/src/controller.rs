//! Measurement controller
//!
//! One call to [`Controller::poll`] is one superloop iteration:
//! - Debounce the button and pick up a console menu key
//! - Sample the streaming channel when its interval elapses
//! - Apply the user event to the menu
//! - Mirror the mode on the LEDs

use cadence_core::debounce::Debouncer;
use cadence_core::delay::ConfigError;
use cadence_core::scheduler::{Sequencer, Step};
use cadence_core::state::{Channel, Event, Mode};
use cadence_core::traits::{ImuSensor, SensorError};
use cadence_drivers::console::{self, ConsoleError, Line};
use cadence_drivers::sensor::Mpu6050Error;
use cadence_hal::time::TickSource;
use cadence_hal_stm32f4::{Button, I2cBusError, SystemTick, UartBusError};
use defmt::*;

use crate::board::{self, Board, BoardConsole, BoardImu, Leds};

/// Startup failures that end in the fault pattern
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Timer configuration rejected
    Config(ConfigError),
    /// Console unusable
    Console(ConsoleError<UartBusError>),
    /// IMU missing or not responding
    Sensor(Mpu6050Error<I2cBusError>),
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        StartupError::Config(e)
    }
}

impl From<ConsoleError<UartBusError>> for StartupError {
    fn from(e: ConsoleError<UartBusError>) -> Self {
        StartupError::Console(e)
    }
}

impl From<Mpu6050Error<I2cBusError>> for StartupError {
    fn from(e: Mpu6050Error<I2cBusError>) -> Self {
        StartupError::Sensor(e)
    }
}

/// Reasons a due sample is skipped
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum SampleError {
    /// IMU read failed
    Sensor(SensorError),
    /// Reading did not fit a console line
    Overflow,
}

impl From<SensorError> for SampleError {
    fn from(e: SensorError) -> Self {
        SampleError::Sensor(e)
    }
}

/// Superloop state
pub struct Controller {
    clock: SystemTick,
    button: Debouncer<Button<'static>>,
    sequencer: Sequencer,
    imu: BoardImu,
    console: BoardConsole,
    leds: Leds,
    /// Debounce recoveries already reported
    recoveries_seen: u32,
    /// Failed samples since boot
    sample_errors: u32,
}

impl Controller {
    /// Build the controller from initialized peripherals
    ///
    /// On failure the LEDs are handed back so the caller can show the
    /// fault pattern.
    pub fn new(hw: Board) -> Result<Self, (StartupError, Leds)> {
        let Board {
            button,
            leds,
            console,
            imu,
        } = hw;

        let parts = Debouncer::new(button, board::debounce_config().settle).and_then(|button| {
            Sequencer::new(&board::measure_config()).map(|sequencer| (button, sequencer))
        });
        let (button, sequencer) = match parts {
            Ok(parts) => parts,
            Err(e) => return Err((e.into(), leds)),
        };

        Ok(Self {
            clock: SystemTick,
            button,
            sequencer,
            imu,
            console,
            leds,
            recoveries_seen: 0,
            sample_errors: 0,
        })
    }

    /// Banner, sensor bring-up and menu
    pub fn start(&mut self) -> Result<(), StartupError> {
        self.console
            .print_banner(board::CONSOLE_INSTANCE, &board::console_config())?;
        info!("Console up at {} baud", board::console_config().baudrate);

        if let Err(e) = self.imu.init() {
            // Best effort: the console already works at this point
            let _ = self.console.send_str("Error initializing the I2C module.\n\r");
            return Err(e.into());
        }
        self.console
            .send_str("I2C module initialized and connected to the MPU6050.\n\r")?;
        info!("MPU6050 initialized: {}", self.imu.config());

        self.console.print_menu()?;
        self.leds.show(Mode::Start.indicator());
        Ok(())
    }

    /// Current menu mode
    pub fn mode(&self) -> Mode {
        self.sequencer.mode()
    }

    /// Show the fault pattern and park the core
    pub fn halt(&mut self) -> ! {
        board::halt(&mut self.leds)
    }

    /// One superloop iteration
    pub fn poll(&mut self) -> Step {
        self.button.update(&self.clock);
        self.report_recoveries();

        let event = if self.button.read_falling_edge() {
            Some(Event::KeyPressed)
        } else {
            self.menu_key()
        };

        let step = self.sequencer.update(&self.clock, event);

        if let Some(channel) = step.sample {
            self.sample(channel);
        }

        if let Some(mode) = step.switched_to {
            info!("Mode -> {} at {} ms", mode, self.clock.now());
            self.leds.show(mode.indicator());
        }

        step
    }

    /// Console key, if one arrived and maps to a channel
    fn menu_key(&mut self) -> Option<Event> {
        match self.console.poll_key() {
            Ok(Some(key)) => Event::from_menu_key(key),
            Ok(None) => None,
            Err(e) => {
                debug!("Console receive error: {}", e);
                None
            }
        }
    }

    /// Read one channel and replace the screen with it
    fn sample(&mut self, channel: Channel) {
        let line = match self.read_line(channel) {
            Ok(line) => line,
            Err(e) => {
                self.sample_errors = self.sample_errors.wrapping_add(1);
                warn!(
                    "{} sample failed: {} ({} errors)",
                    channel, e, self.sample_errors
                );
                return;
            }
        };

        if let Err(e) = self.console.show_line(&line) {
            warn!("Console write failed: {}", e);
        }
    }

    fn read_line(&mut self, channel: Channel) -> Result<Line, SampleError> {
        let formatted = match channel {
            Channel::Gyro => console::format_gyro(&self.imu.read_gyro()?),
            Channel::Accel => console::format_accel(&self.imu.read_accel()?),
            Channel::Temp => console::format_temperature(self.imu.read_temperature()?),
        };
        formatted.map_err(|_| SampleError::Overflow)
    }

    fn report_recoveries(&mut self) {
        let recoveries = self.button.recoveries();
        if recoveries != self.recoveries_seen {
            warn!("Debounce state recovered ({} total)", recoveries);
            self.recoveries_seen = recoveries;
        }
    }
}
