//! Motor-controller telemetry consumer
//!
//! The controller's native protocol is decoded by an external driver,
//! which drops ready-made updates into `CONTROLLER_TELEMETRY`. This task
//! fills in the derived fields (battery percentage, road speed) and
//! applies the update to the store as one transaction.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use tailwind_core::config::{BatteryConfig, DriveConfig};
use tailwind_core::power;
use tailwind_core::telemetry::TelemetryStore;

use crate::channels::CONTROLLER_TELEMETRY;

#[embassy_executor::task]
pub async fn controller_poll_task(store: &'static TelemetryStore<CriticalSectionRawMutex>) {
    info!("Controller telemetry task started");

    let battery = BatteryConfig::default();
    let drive = DriveConfig::default();

    loop {
        let mut update = CONTROLLER_TELEMETRY.receive().await;

        update.battery_percentage = power::battery_percentage(update.battery_voltage, &battery);
        update.speed_kmh = power::speed_kmh_from_erpm(update.erpm, &drive);

        if !store.publish_controller(update).await {
            trace!("Controller update dropped, store busy");
        }
    }
}
