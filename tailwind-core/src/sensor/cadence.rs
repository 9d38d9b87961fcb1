//! Crank cadence estimation from PAS pulse timing
//!
//! The pedal-assist sensor emits a fixed number of pulses per crank
//! revolution. Cadence is derived from the interval between consecutive
//! pulses and decays to zero once the pedals sit still longer than the
//! idle window.

use crate::config::CadenceConfig;

/// Cadence estimator fed with pulse timestamps
#[derive(Debug, Clone)]
pub struct CadenceEstimator {
    config: CadenceConfig,
    last_pulse_ms: Option<u64>,
    rpm: f32,
}

impl CadenceEstimator {
    pub fn new(config: CadenceConfig) -> Self {
        Self {
            config,
            last_pulse_ms: None,
            rpm: 0.0,
        }
    }

    /// Record one PAS pulse observed at `now_ms`
    pub fn pulse(&mut self, now_ms: u64) {
        if let Some(last) = self.last_pulse_ms {
            let interval_ms = now_ms.saturating_sub(last);
            if interval_ms > 0 {
                // One revolution spans pulses_per_rev intervals.
                let rev_ms = interval_ms * u64::from(self.config.pulses_per_rev);
                self.rpm = 60_000.0 / rev_ms as f32;
            }
        }
        self.last_pulse_ms = Some(now_ms);
    }

    /// Current cadence at `now_ms`, zeroed after the idle window
    pub fn update(&mut self, now_ms: u64) -> f32 {
        if let Some(last) = self.last_pulse_ms {
            if now_ms.saturating_sub(last) > u64::from(self.config.idle_timeout_ms) {
                self.rpm = 0.0;
                self.last_pulse_ms = None;
            }
        }
        self.rpm
    }

    pub fn rpm(&self) -> f32 {
        self.rpm
    }
}
