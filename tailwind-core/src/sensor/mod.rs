//! Pedal sensing: torque calibration/evaluation and cadence estimation

pub mod cadence;
pub mod calibration;
pub mod torque;

pub use cadence::CadenceEstimator;
pub use calibration::{CalibrationState, CalibrationStatus, Calibrator};
pub use torque::{TorqueEvaluator, TorqueInput, TorqueReading};
