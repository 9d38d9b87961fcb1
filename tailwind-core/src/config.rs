//! Configuration type definitions
//!
//! Tunables for the sensing core. Defaults match the reference hardware:
//! a strain-gauge torque sensor on a 12-bit ADC with a 3k pull-down
//! divider, centered near mid-scale at rest.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Torque sensor scaling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TorqueSensorConfig {
    /// Lowest physically reachable raw reading (full backward pedal pressure)
    pub adc_min: u16,
    /// Highest physically reachable raw reading (full forward pedal pressure)
    pub adc_max: u16,
    /// Baseline used before calibration completes or when it falls back
    pub default_baseline: u16,
    /// Dead-zone half-width in ADC counts; deviations below this read as zero
    pub threshold: u16,
    /// Torque reported at full-scale deviation (Nm)
    pub max_torque_nm: f32,
}

impl Default for TorqueSensorConfig {
    fn default() -> Self {
        Self {
            adc_min: 0,
            adc_max: 4095,
            default_baseline: 2048,
            threshold: 50,
            max_torque_nm: 80.0,
        }
    }
}

/// Zero-force calibration run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationConfig {
    /// Number of samples to take
    pub samples: u16,
    /// Delay between samples (ms)
    pub sample_interval_ms: u32,
    /// Overall run timeout (ms)
    pub timeout_ms: u32,
    /// Lowest plausible zero-force reading; anything below is a glitch
    pub min_valid: u16,
    /// Highest plausible zero-force reading; anything above is a glitch
    pub max_valid: u16,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: 50,
            sample_interval_ms: 20,
            timeout_ms: 5000,
            min_valid: 100,
            max_valid: 3995,
        }
    }
}

/// Cadence estimation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CadenceConfig {
    /// PAS pulses per full crank revolution
    pub pulses_per_rev: u8,
    /// Cadence decays to zero after this long without a pulse (ms)
    pub idle_timeout_ms: u32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            pulses_per_rev: 12,
            idle_timeout_ms: 1500,
        }
    }
}

/// Battery voltage window for percentage estimation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryConfig {
    /// Voltage reported as 100%
    pub full_voltage: f32,
    /// Voltage reported as 0%
    pub critical_voltage: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        // 13S li-ion pack
        Self {
            full_voltage: 54.6,
            critical_voltage: 42.0,
        }
    }
}

/// Drivetrain geometry for speed derivation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// Motor pole pairs (electrical RPM / pole pairs = mechanical RPM)
    pub motor_pole_pairs: u8,
    /// Driven wheel circumference in metres
    pub wheel_circumference_m: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        // Direct-drive hub motor on a 28" wheel
        Self {
            motor_pole_pairs: 23,
            wheel_circumference_m: 2.23,
        }
    }
}

/// Bounded wait applied to every telemetry store acquisition (ms)
pub const STORE_LOCK_TIMEOUT_MS: u64 = 10;
