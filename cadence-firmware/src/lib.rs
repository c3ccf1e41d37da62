//! Board support shared by the Cadence binaries
//!
//! - `board`: clock tree, pin map and peripheral bring-up
//! - `controller`: the measurement superloop body

#![no_std]

pub mod board;
pub mod controller;
