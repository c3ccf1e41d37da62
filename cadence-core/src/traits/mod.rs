//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and sensor-specific implementations.

pub mod imu;

pub use imu::{Axes, ImuSensor, SensorError};
