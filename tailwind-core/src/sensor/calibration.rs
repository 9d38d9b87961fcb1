//! Torque sensor zero-force calibration
//!
//! One-shot startup procedure that establishes the raw reading
//! corresponding to zero applied pedal force. Samples are taken at a
//! fixed interval, glitches outside the plausible range are discarded,
//! and the baseline is the rounded mean of the accepted samples. Every
//! path terminates with a usable baseline: a timeout or too few valid
//! samples falls back to the configured default instead of failing.
//!
//! The sampling loop itself lives in the firmware; this module is a
//! sans-io state machine fed `(sample, elapsed_ms)` pairs so tests can
//! run a full calibration instantaneously.

use crate::config::CalibrationConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Calibration lifecycle status
///
/// Monotonic: once a terminal status (`Complete` or `FailedUsingDefault`)
/// is reached it never regresses, and the baseline is frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalibrationStatus {
    /// Calibration has not been run
    #[default]
    NotStarted,
    /// Sampling loop is running
    InProgress,
    /// Baseline established from sensor samples
    Complete,
    /// Not enough valid samples; default baseline in use
    FailedUsingDefault,
}

impl CalibrationStatus {
    /// Terminal statuses carry a baseline the rest of the system can use
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::FailedUsingDefault)
    }
}

/// Calibration outcome consumed by the torque evaluator every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationState {
    /// Raw sensor reading interpreted as zero applied force
    pub baseline: u16,
    pub status: CalibrationStatus,
}

impl CalibrationState {
    /// State used while calibration has not yet produced a result
    ///
    /// The evaluator tolerates being called before calibration completes;
    /// it runs against the conservative default baseline.
    pub fn pre_calibration(default_baseline: u16) -> Self {
        Self {
            baseline: default_baseline,
            status: CalibrationStatus::NotStarted,
        }
    }
}

/// Zero-force calibration state machine
///
/// Drive it by feeding one raw sample at a time together with the
/// elapsed time since the run started. Returns the terminal
/// [`CalibrationState`] once sampling finishes, either by sample count
/// or by timeout.
#[derive(Debug, Clone)]
pub struct Calibrator {
    config: CalibrationConfig,
    default_baseline: u16,
    sum: u32,
    accepted: u16,
    taken: u16,
    result: Option<CalibrationState>,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig, default_baseline: u16) -> Self {
        Self {
            config,
            default_baseline,
            sum: 0,
            accepted: 0,
            taken: 0,
            result: None,
        }
    }

    /// Bench-mode bypass: no sampling, default baseline, immediately
    /// `Complete`. Calibration must never block development runs.
    pub fn bench(default_baseline: u16) -> CalibrationState {
        CalibrationState {
            baseline: default_baseline,
            status: CalibrationStatus::Complete,
        }
    }

    pub fn status(&self) -> CalibrationStatus {
        match self.result {
            Some(state) => state.status,
            None if self.taken > 0 => CalibrationStatus::InProgress,
            None => CalibrationStatus::NotStarted,
        }
    }

    /// Samples accepted so far
    pub fn accepted(&self) -> u16 {
        self.accepted
    }

    /// Feed one raw sample taken `elapsed_ms` after the run started
    ///
    /// Returns the terminal state once the run finishes; `None` while
    /// more samples are wanted. Terminal results are latched: further
    /// calls return the same state without mutating it.
    pub fn ingest(&mut self, sample: u16, elapsed_ms: u32) -> Option<CalibrationState> {
        if let Some(done) = self.result {
            return Some(done);
        }

        if elapsed_ms > self.config.timeout_ms {
            // Timed out before this sample; discard it and settle.
            return Some(self.finish());
        }

        self.taken += 1;
        if sample >= self.config.min_valid && sample <= self.config.max_valid {
            self.sum += u32::from(sample);
            self.accepted += 1;
        }

        if self.taken >= self.config.samples {
            return Some(self.finish());
        }
        None
    }

    fn finish(&mut self) -> CalibrationState {
        // At least half the requested samples must be valid, otherwise
        // drift compensation would be based on noise.
        let state = if self.accepted >= self.config.samples / 2 {
            let count = u32::from(self.accepted);
            let mean = (self.sum + count / 2) / count;
            CalibrationState {
                baseline: mean as u16,
                status: CalibrationStatus::Complete,
            }
        } else {
            CalibrationState {
                baseline: self.default_baseline,
                status: CalibrationStatus::FailedUsingDefault,
            }
        };
        self.result = Some(state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(samples: u16) -> CalibrationConfig {
        CalibrationConfig {
            samples,
            sample_interval_ms: 0,
            timeout_ms: 1000,
            min_valid: 100,
            max_valid: 3995,
        }
    }

    #[test]
    fn test_all_valid_samples_yield_rounded_mean() {
        let mut cal = Calibrator::new(quick_config(5), 2048);
        let samples = [2000u16, 2010, 2005, 2020, 1995];

        let mut result = None;
        for (i, s) in samples.iter().enumerate() {
            result = cal.ingest(*s, i as u32);
        }

        let state = result.unwrap();
        assert_eq!(state.status, CalibrationStatus::Complete);
        assert_eq!(state.baseline, 2006);
    }

    #[test]
    fn test_glitches_discarded_but_half_valid_completes() {
        let mut cal = Calibrator::new(quick_config(6), 2048);
        // Three glitches, three valid: exactly half, still completes.
        let samples = [50u16, 4000, 0, 2000, 2000, 2000];

        let mut result = None;
        for (i, s) in samples.iter().enumerate() {
            result = cal.ingest(*s, i as u32);
        }

        let state = result.unwrap();
        assert_eq!(state.status, CalibrationStatus::Complete);
        assert_eq!(state.baseline, 2000);
    }

    #[test]
    fn test_zero_valid_samples_fall_back_to_default() {
        let mut cal = Calibrator::new(quick_config(4), 2048);

        let mut result = None;
        for i in 0..4 {
            result = cal.ingest(10, i);
        }

        let state = result.unwrap();
        assert_eq!(state.status, CalibrationStatus::FailedUsingDefault);
        assert_eq!(state.baseline, 2048);
    }

    #[test]
    fn test_timeout_resolves_with_partial_samples() {
        let mut cal = Calibrator::new(quick_config(100), 2048);

        // 60 of 100 samples arrive before the timeout: enough for a mean.
        for i in 0..60 {
            assert!(cal.ingest(2000, i * 10).is_none());
        }
        let state = cal.ingest(2000, 2000).unwrap();
        assert_eq!(state.status, CalibrationStatus::Complete);
        assert_eq!(state.baseline, 2000);
    }

    #[test]
    fn test_timeout_with_too_few_samples_uses_default() {
        let mut cal = Calibrator::new(quick_config(100), 2048);

        for i in 0..10 {
            assert!(cal.ingest(2000, i).is_none());
        }
        let state = cal.ingest(2000, 5000).unwrap();
        assert_eq!(state.status, CalibrationStatus::FailedUsingDefault);
        assert_eq!(state.baseline, 2048);
    }

    #[test]
    fn test_terminal_state_is_latched() {
        let mut cal = Calibrator::new(quick_config(2), 2048);
        cal.ingest(2000, 0);
        let first = cal.ingest(2010, 1).unwrap();
        assert!(first.status.is_terminal());

        // Further samples must not move the baseline.
        let again = cal.ingest(3000, 2).unwrap();
        assert_eq!(again, first);
        assert_eq!(cal.status(), CalibrationStatus::Complete);
    }

    #[test]
    fn test_status_progression() {
        let mut cal = Calibrator::new(quick_config(3), 2048);
        assert_eq!(cal.status(), CalibrationStatus::NotStarted);
        cal.ingest(2000, 0);
        assert_eq!(cal.status(), CalibrationStatus::InProgress);
        cal.ingest(2000, 1);
        cal.ingest(2000, 2);
        assert_eq!(cal.status(), CalibrationStatus::Complete);
    }

    #[test]
    fn test_bench_mode_completes_immediately() {
        let state = Calibrator::bench(2048);
        assert_eq!(state.status, CalibrationStatus::Complete);
        assert_eq!(state.baseline, 2048);
    }
}
