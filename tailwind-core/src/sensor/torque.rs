//! Per-cycle torque evaluation
//!
//! Maps a raw sensor sample plus the calibrated baseline into a bounded,
//! non-negative torque. Deviation direction is discarded: the sensor is
//! mounted symmetrically, so forward and backward pedal pressure read
//! identically and only force magnitude matters.
//!
//! Two strategies share the same input/output contract:
//!
//! - live: dead-zone around the baseline, linear scaling against the
//!   larger deviation extent, clamp to `[0, max_torque_nm]`
//! - simulated: an externally driven target torque is reverse-mapped
//!   into a synthetic raw sample and reported directly, with no
//!   dead-zone, so test runs are bit-reproducible without hardware

use crate::config::TorqueSensorConfig;
use crate::sensor::calibration::CalibrationState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One evaluation input, selecting the strategy to apply
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TorqueInput {
    /// Raw ADC sample from the sensor
    Raw(u16),
    /// Simulation target torque in Nm
    Simulated(f32),
}

/// Result of one evaluation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TorqueReading {
    /// Raw sample the reading was derived from (synthetic in simulation)
    pub raw: u16,
    /// Signed deviation from the calibrated baseline, in ADC counts
    pub deviation: i32,
    /// Clamped to `[0, max_torque_nm]`; zero inside the dead-zone
    pub torque_nm: f32,
}

/// Torque evaluator
///
/// Pure per-cycle function of `(input, calibration)`; holds only the
/// sensor scaling configuration.
#[derive(Debug, Clone)]
pub struct TorqueEvaluator {
    config: TorqueSensorConfig,
}

impl TorqueEvaluator {
    pub fn new(config: TorqueSensorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TorqueSensorConfig {
        &self.config
    }

    /// Evaluate one control cycle
    pub fn evaluate(&self, input: TorqueInput, calibration: &CalibrationState) -> TorqueReading {
        match input {
            TorqueInput::Raw(raw) => self.evaluate_live(raw, calibration),
            TorqueInput::Simulated(target_nm) => self.evaluate_simulated(target_nm, calibration),
        }
    }

    /// Largest possible deviation from the baseline toward either
    /// physical extent. Zero if calibration degenerated onto an extent.
    fn max_extent(&self, baseline: u16) -> i32 {
        let backward = i32::from(baseline) - i32::from(self.config.adc_min);
        let forward = i32::from(self.config.adc_max) - i32::from(baseline);
        backward.max(forward)
    }

    /// Live strategy: dead-zone, scale, clamp
    pub fn evaluate_live(&self, raw: u16, calibration: &CalibrationState) -> TorqueReading {
        let deviation = i32::from(raw) - i32::from(calibration.baseline);
        let absolute_deviation = deviation.unsigned_abs();

        let max_extent = self.max_extent(calibration.baseline);
        if max_extent <= 0 || absolute_deviation < u32::from(self.config.threshold) {
            // Degenerate calibration reads as zero torque rather than
            // dividing by zero; below threshold is sensor noise.
            return TorqueReading {
                raw,
                deviation,
                torque_nm: 0.0,
            };
        }

        // An out-of-range raw sample can push the ratio above 1; the
        // clamp absorbs it (clamp-after-scale, matching the sensor's
        // saturation behavior at the physical extents).
        let torque_nm = (absolute_deviation as f32 / max_extent as f32 * self.config.max_torque_nm)
            .clamp(0.0, self.config.max_torque_nm);

        TorqueReading {
            raw,
            deviation,
            torque_nm,
        }
    }

    /// Simulation strategy: reverse-map a target torque into a synthetic
    /// raw sample and report the target directly, with no dead-zone
    pub fn evaluate_simulated(&self, target_nm: f32, calibration: &CalibrationState) -> TorqueReading {
        let torque_nm = target_nm.clamp(0.0, self.config.max_torque_nm);

        let max_extent = self.max_extent(calibration.baseline);
        if torque_nm <= 0.0 || max_extent <= 0 {
            return TorqueReading {
                raw: calibration.baseline,
                deviation: 0,
                torque_nm: 0.0,
            };
        }

        let ratio = torque_nm / self.config.max_torque_nm;
        let deviation = (ratio * max_extent as f32) as i32;
        let raw = (i32::from(calibration.baseline) + deviation)
            .clamp(i32::from(self.config.adc_min), i32::from(self.config.adc_max))
            as u16;

        TorqueReading {
            raw,
            deviation,
            torque_nm,
        }
    }
}
