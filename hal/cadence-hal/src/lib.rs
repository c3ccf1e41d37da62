//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the capabilities the cooperative core and the drivers
//! are written against. Chip-specific crates implement them; host tests
//! implement them with plain mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Superloop (cadence-firmware)           │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │  cadence-core   │   │ cadence-drivers │
//! └─────────────────┘   └─────────────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal-stm32f4 (embassy-stm32)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`time::TickSource`] - Monotonic millisecond tick counter
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use time::{Tick, TickSource};
pub use uart::{UartRx, UartTx};
