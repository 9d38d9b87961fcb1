//! Real-time control loop task
//!
//! Runs the one-shot torque calibration at startup, then evaluates the
//! torque sensor every cycle and publishes the sensor field group into
//! the telemetry store. Highest-priority work in the system; the only
//! suspension points are the ADC conversion, the loop ticker, and the
//! bounded store acquisition.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Instant, Ticker, Timer};

use tailwind_core::config::{CadenceConfig, CalibrationConfig, TorqueSensorConfig};
use tailwind_core::sensor::{
    CadenceEstimator, CalibrationState, CalibrationStatus, Calibrator, TorqueEvaluator,
    TorqueInput,
};
use tailwind_core::telemetry::{SensorUpdate, TelemetryStore};

use crate::channels::{MODE_SELECT, MOTOR_ENABLE, PAS_PULSES};

/// Control loop configuration
#[derive(Clone)]
pub struct ControlLoopConfig {
    /// Loop period (ms)
    pub loop_interval_ms: u64,
    /// Skip calibration entirely (bench/development runs)
    pub bench_mode: bool,
    /// Drive the evaluator from the pedal simulation instead of the ADC
    pub simulate_torque: bool,
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 10,
            bench_mode: false,
            simulate_torque: false,
        }
    }
}

/// Triangle-wave pedal target for simulation runs
struct PedalSimulation {
    target_nm: f32,
    step_nm: f32,
    max_nm: f32,
}

impl PedalSimulation {
    fn new(max_nm: f32) -> Self {
        Self {
            target_nm: 0.0,
            step_nm: 0.5,
            max_nm,
        }
    }

    fn next(&mut self) -> f32 {
        self.target_nm += self.step_nm;
        if self.target_nm >= self.max_nm {
            self.target_nm = self.max_nm;
            self.step_nm = -self.step_nm;
        } else if self.target_nm <= 0.0 {
            self.target_nm = 0.0;
            self.step_nm = -self.step_nm;
        }
        self.target_nm
    }
}

/// Control loop task - calibrate once, then evaluate and publish forever
#[embassy_executor::task]
pub async fn control_loop_task(
    mut adc: Adc<'static, Async>,
    mut torque_channel: Channel<'static>,
    store: &'static TelemetryStore<CriticalSectionRawMutex>,
    config: ControlLoopConfig,
) {
    info!("Control loop task started");

    let sensor_config = TorqueSensorConfig::default();

    let calibration = if config.bench_mode {
        info!("Torque calibration skipped: bench mode");
        Calibrator::bench(sensor_config.default_baseline)
    } else {
        run_calibration(&mut adc, &mut torque_channel, sensor_config.default_baseline).await
    };

    let evaluator = TorqueEvaluator::new(sensor_config);
    let mut cadence = CadenceEstimator::new(CadenceConfig::default());
    let mut pedal_sim = PedalSimulation::new(evaluator.config().max_torque_nm);

    let mut mode: u8 = 0;
    let mut motor_enabled = false;

    let mut ticker = Ticker::every(Duration::from_millis(config.loop_interval_ms));

    loop {
        // Drain pulse timestamps accumulated since the last cycle.
        while let Ok(pulse) = PAS_PULSES.try_receive() {
            cadence.pulse(pulse.as_millis());
        }

        if let Some(m) = MODE_SELECT.try_take() {
            mode = m;
            info!("Assist mode -> {}", m);
        }
        if let Some(enabled) = MOTOR_ENABLE.try_take() {
            motor_enabled = enabled;
            info!("Motor enabled -> {}", enabled);
        }

        let input = if config.simulate_torque {
            TorqueInput::Simulated(pedal_sim.next())
        } else {
            match adc.read(&mut torque_channel).await {
                Ok(raw) => TorqueInput::Raw(raw),
                Err(_) => {
                    warn!("Torque ADC read error");
                    // Reads as zero torque this cycle.
                    TorqueInput::Raw(calibration.baseline)
                }
            }
        };

        let reading = evaluator.evaluate(input, &calibration);
        let cadence_rpm = cadence.update(Instant::now().as_millis());

        let delivered = store
            .publish_sensor(SensorUpdate {
                torque_nm: reading.torque_nm,
                cadence_rpm,
                calibration: calibration.status,
                mode,
                motor_enabled,
            })
            .await;
        if !delivered {
            trace!("Sensor update dropped, store busy");
        }

        ticker.next().await;
    }
}

/// Drive the calibration state machine against the real ADC
async fn run_calibration(
    adc: &mut Adc<'static, Async>,
    torque_channel: &mut Channel<'static>,
    default_baseline: u16,
) -> CalibrationState {
    info!("Torque sensor calibration starting; keep pedals unloaded");

    let config = CalibrationConfig::default();
    let mut calibrator = Calibrator::new(config, default_baseline);
    let started = Instant::now();

    loop {
        // A failed conversion reads as 0, outside the plausible range,
        // and is discarded like any other glitch.
        let sample = adc.read(torque_channel).await.unwrap_or(0);

        if let Some(state) = calibrator.ingest(sample, started.elapsed().as_millis() as u32) {
            match state.status {
                CalibrationStatus::Complete => info!(
                    "Calibration complete: baseline {} ({} samples accepted)",
                    state.baseline,
                    calibrator.accepted()
                ),
                _ => warn!(
                    "Calibration failed, using default baseline {}",
                    state.baseline
                ),
            }
            return state;
        }

        Timer::after_millis(u64::from(config.sample_interval_ms)).await;
    }
}
