//! Hardware driver implementations
//!
//! This crate provides concrete implementations on top of the traits
//! defined in cadence-hal and cadence-core:
//!
//! - MPU6050 inertial sensor (I2C)
//! - Serial text console (UART)
//! - Three-LED mode indicator (GPIO)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod console;
pub mod indicator;
pub mod sensor;
