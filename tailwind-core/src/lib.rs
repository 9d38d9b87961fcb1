//! Board-agnostic core logic for the Tailwind pedal-assist controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Torque sensor calibration (zero-force baseline acquisition)
//! - Per-cycle torque evaluation with dead-zone and saturation
//! - Cadence estimation from PAS pulse timing
//! - The shared telemetry store exchanged between the control loop
//!   and the telemetry publisher tasks
//! - Power and battery estimation helpers

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod power;
pub mod sensor;
pub mod telemetry;
