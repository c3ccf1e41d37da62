//! Board-agnostic core logic for the cadence firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Non-blocking tick delays
//! - Push-button debouncing
//! - Measurement menu state machine
//! - Sample sequencing
//! - Sensor traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod debounce;
pub mod delay;
pub mod scheduler;
pub mod state;
pub mod traits;
