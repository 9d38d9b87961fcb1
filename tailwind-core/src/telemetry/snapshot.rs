//! Telemetry snapshot data model
//!
//! The single shared state region between producers (control loop,
//! motor-controller driver) and consumers (telemetry publishers). All
//! types are `Copy` so `snapshot()` can hand out a by-value copy under
//! the store lock.

use crate::sensor::calibration::CalibrationStatus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fields owned by the control loop producer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorGroup {
    /// Filtered crank torque (Nm)
    pub torque_nm: f32,
    /// Crank cadence (RPM)
    pub cadence_rpm: f32,
    /// Torque sensor calibration outcome, for diagnostic display
    pub calibration: CalibrationStatus,
    /// Active assist mode index (opaque to this core)
    pub mode: u8,
    pub motor_enabled: bool,
}

/// Fields owned by the motor-controller driver producer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerGroup {
    pub speed_kmh: f32,
    pub battery_voltage: f32,
    pub battery_percentage: f32,
    /// Motor current (A); negative while regenerating
    pub motor_current: f32,
    /// Electrical RPM as reported by the controller
    pub erpm: f32,
    pub duty_cycle: f32,
    pub temp_mosfet_c: f32,
    pub temp_motor_c: f32,
    /// Accumulated energy counters
    pub amp_hours: f32,
    pub watt_hours: f32,
}

/// Derived power estimates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerGroup {
    /// Rider input power (W), follows the sensor transaction
    pub human_w: f32,
    /// Motor assist power (W), follows the controller transaction
    pub assist_w: f32,
}

/// Point-in-time copy of all shared telemetry fields
///
/// The per-group update counters advance once per producer transaction;
/// a consumer holding two snapshots can tell which groups changed in
/// between.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetrySnapshot {
    pub sensor: SensorGroup,
    pub controller: ControllerGroup,
    pub power: PowerGroup,
    /// Completed `publish_sensor` transactions
    pub sensor_updates: u32,
    /// Completed `publish_controller` transactions
    pub controller_updates: u32,
}
