//! Sensor drivers

pub mod mpu6050;

pub use mpu6050::{AccelRange, GyroRange, Mpu6050, Mpu6050Config, Mpu6050Error};
