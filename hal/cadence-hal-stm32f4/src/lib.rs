//! STM32F4-specific HAL for the Cadence firmware
//!
//! This crate implements the `cadence-hal` traits on top of embassy-stm32
//! peripherals in blocking mode. It supports:
//!
//! - STM32F429ZI (Nucleo-F429ZI)
//!
//! # Features
//!
//! - `stm32f429zi` - Enable support for STM32F429ZIT6
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware creates the embassy peripherals, converts the board
//! settings with the `to_embassy_config` helpers, and wraps the drivers in
//! the adapters here before handing them to `cadence-drivers`.

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod time;
pub mod uart;

pub use gpio::{Button, Led};
pub use i2c::{BlockingI2c, I2cBusError};
pub use time::SystemTick;
pub use uart::{BlockingUart, UartBusError};
