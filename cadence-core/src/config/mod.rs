//! Configuration types
//!
//! Timing constants and the validated configuration structures the
//! superloop is built from. Firmware fills these from its board file at
//! build time; everything is checked again on construction.

pub mod types;

pub use types::*;
