//! Cross-task telemetry store
//!
//! One mutual-exclusion primitive guards the whole snapshot. Each
//! producer call applies its field group as a single transaction;
//! `snapshot()` copies the structure out by value, so a consumer never
//! observes fields from two different transactions mixed mid-write.
//!
//! Every acquisition is bounded: if the lock is not obtained within the
//! configured timeout, a producer silently drops the update (the next
//! cycle supersedes it) and a consumer skips the cycle. Nothing in here
//! blocks a caller indefinitely. Update and consume rates are single- to
//! double-digit Hz, so one plain mutex beats a reader-writer scheme on
//! simplicity with no contention to speak of.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration};

use crate::power;
use crate::sensor::calibration::CalibrationStatus;
use crate::telemetry::snapshot::TelemetrySnapshot;

/// One sensor-group transaction, written by the control loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorUpdate {
    pub torque_nm: f32,
    pub cadence_rpm: f32,
    pub calibration: CalibrationStatus,
    pub mode: u8,
    pub motor_enabled: bool,
}

/// One controller-group transaction, written by the driver task
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerUpdate {
    pub speed_kmh: f32,
    pub battery_voltage: f32,
    pub battery_percentage: f32,
    pub motor_current: f32,
    pub erpm: f32,
    pub duty_cycle: f32,
    pub temp_mosfet_c: f32,
    pub temp_motor_c: f32,
    pub amp_hours: f32,
    pub watt_hours: f32,
}

/// Shared telemetry store
///
/// Constructed once at startup and passed by reference into every
/// producer and consumer task. Generic over the raw mutex so firmware
/// can share it across cores while host tests run it under threads.
pub struct TelemetryStore<M: RawMutex> {
    inner: Mutex<M, TelemetrySnapshot>,
    lock_timeout: Duration,
}

impl<M: RawMutex> TelemetryStore<M> {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(TelemetrySnapshot::default()),
            lock_timeout,
        }
    }

    /// Apply one sensor transaction
    ///
    /// Recomputes the rider power estimate inside the same transaction so
    /// the power group stays consistent with the sensor group. Returns
    /// `false` if the lock was not acquired in time and the update was
    /// dropped.
    pub async fn publish_sensor(&self, update: SensorUpdate) -> bool {
        match with_timeout(self.lock_timeout, self.inner.lock()).await {
            Ok(mut snapshot) => {
                snapshot.sensor.torque_nm = update.torque_nm;
                snapshot.sensor.cadence_rpm = update.cadence_rpm;
                snapshot.sensor.calibration = update.calibration;
                snapshot.sensor.mode = update.mode;
                snapshot.sensor.motor_enabled = update.motor_enabled;
                snapshot.power.human_w =
                    power::human_power_w(update.torque_nm, update.cadence_rpm);
                snapshot.sensor_updates = snapshot.sensor_updates.wrapping_add(1);
                true
            }
            Err(_) => false,
        }
    }

    /// Apply one controller transaction
    pub async fn publish_controller(&self, update: ControllerUpdate) -> bool {
        match with_timeout(self.lock_timeout, self.inner.lock()).await {
            Ok(mut snapshot) => {
                snapshot.controller.speed_kmh = update.speed_kmh;
                snapshot.controller.battery_voltage = update.battery_voltage;
                snapshot.controller.battery_percentage = update.battery_percentage;
                snapshot.controller.motor_current = update.motor_current;
                snapshot.controller.erpm = update.erpm;
                snapshot.controller.duty_cycle = update.duty_cycle;
                snapshot.controller.temp_mosfet_c = update.temp_mosfet_c;
                snapshot.controller.temp_motor_c = update.temp_motor_c;
                snapshot.controller.amp_hours = update.amp_hours;
                snapshot.controller.watt_hours = update.watt_hours;
                snapshot.power.assist_w =
                    power::assist_power_w(update.battery_voltage, update.motor_current);
                snapshot.controller_updates = snapshot.controller_updates.wrapping_add(1);
                true
            }
            Err(_) => false,
        }
    }

    /// Copy the whole snapshot out under the lock
    ///
    /// `None` means the lock was busy past the timeout and this telemetry
    /// cycle should be skipped; the consumer retries on its own schedule.
    pub async fn snapshot(&self) -> Option<TelemetrySnapshot> {
        match with_timeout(self.lock_timeout, self.inner.lock()).await {
            Ok(snapshot) => Some(*snapshot),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;
    use std::vec::Vec;

    type HostStore = TelemetryStore<CriticalSectionRawMutex>;

    fn store() -> Arc<HostStore> {
        Arc::new(TelemetryStore::new(Duration::from_millis(10)))
    }

    /// Sensor update where every observable field encodes the same tag
    fn tagged_sensor(tag: u32) -> SensorUpdate {
        SensorUpdate {
            torque_nm: tag as f32,
            cadence_rpm: tag as f32,
            mode: (tag % 256) as u8,
            ..Default::default()
        }
    }

    fn tagged_controller(tag: u32) -> ControllerUpdate {
        ControllerUpdate {
            battery_voltage: tag as f32,
            erpm: tag as f32,
            watt_hours: tag as f32,
            ..Default::default()
        }
    }

    #[test]
    fn test_publish_then_snapshot() {
        let store = store();

        assert!(block_on(store.publish_sensor(SensorUpdate {
            torque_nm: 12.5,
            cadence_rpm: 60.0,
            calibration: CalibrationStatus::Complete,
            mode: 2,
            motor_enabled: true,
        })));
        assert!(block_on(store.publish_controller(ControllerUpdate {
            battery_voltage: 50.0,
            motor_current: -4.0,
            ..Default::default()
        })));

        let snapshot = block_on(store.snapshot()).unwrap();
        assert_eq!(snapshot.sensor.torque_nm, 12.5);
        assert_eq!(snapshot.sensor.mode, 2);
        assert_eq!(snapshot.controller.battery_voltage, 50.0);
        assert_eq!(snapshot.sensor_updates, 1);
        assert_eq!(snapshot.controller_updates, 1);

        // Derived power follows the producing transaction.
        assert!((snapshot.power.human_w - power::human_power_w(12.5, 60.0)).abs() < 1e-4);
        assert_eq!(snapshot.power.assist_w, 200.0);
    }

    #[test]
    fn test_initial_snapshot_is_zeroed() {
        let snapshot = block_on(store().snapshot()).unwrap();
        assert_eq!(snapshot, TelemetrySnapshot::default());
        assert_eq!(snapshot.sensor.calibration, CalibrationStatus::NotStarted);
    }

    #[test]
    fn test_concurrent_snapshots_never_tear() {
        const TRANSACTIONS: u32 = 2000;
        let store = store();
        let writers_done = Arc::new(AtomicBool::new(false));

        let sensor_writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for tag in 1..=TRANSACTIONS {
                    // Dropped updates are fine; torn ones are not.
                    let _ = block_on(store.publish_sensor(tagged_sensor(tag)));
                }
            })
        };
        let controller_writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for tag in 1..=TRANSACTIONS {
                    let _ = block_on(store.publish_controller(tagged_controller(tag)));
                }
            })
        };

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                let writers_done = Arc::clone(&writers_done);
                thread::spawn(move || {
                    let mut observed = 0u32;
                    loop {
                        let done = writers_done.load(Ordering::Acquire);
                        if let Some(snapshot) = block_on(store.snapshot()) {
                            // Every field of a group must come from the
                            // same transaction.
                            let s = snapshot.sensor;
                            assert_eq!(s.torque_nm, s.cadence_rpm);
                            assert_eq!(s.mode, (s.torque_nm as u32 % 256) as u8);

                            let c = snapshot.controller;
                            assert_eq!(c.battery_voltage, c.erpm);
                            assert_eq!(c.battery_voltage, c.watt_hours);

                            observed += 1;
                        }
                        if done {
                            return observed;
                        }
                    }
                })
            })
            .collect();

        sensor_writer.join().unwrap();
        controller_writer.join().unwrap();
        writers_done.store(true, Ordering::Release);
        for reader in readers {
            assert!(reader.join().unwrap() > 0);
        }
    }

    #[test]
    fn test_snapshot_skips_instead_of_blocking() {
        let store = store();

        // Hold the lock from this thread so the consumer cannot get it.
        let guard = block_on(store.inner.lock());

        let consumer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let started = Instant::now();
                let result = block_on(store.snapshot());
                (result, started.elapsed())
            })
        };

        let (result, elapsed) = consumer.join().unwrap();
        drop(guard);

        // Skip signal, not corrupted data, and well within bounds.
        assert!(result.is_none());
        assert!(elapsed.as_millis() < 1000, "snapshot took {:?}", elapsed);

        // The store self-heals once the writer releases.
        assert!(block_on(store.snapshot()).is_some());
    }

    #[test]
    fn test_producer_drops_update_on_timeout() {
        let store = store();
        let guard = block_on(store.inner.lock());

        let producer = {
            let store = Arc::clone(&store);
            thread::spawn(move || block_on(store.publish_sensor(tagged_sensor(7))))
        };
        assert!(!producer.join().unwrap());
        drop(guard);

        // The dropped transaction left no trace.
        let snapshot = block_on(store.snapshot()).unwrap();
        assert_eq!(snapshot.sensor_updates, 0);
        assert_eq!(snapshot.sensor.torque_nm, 0.0);
    }
}
