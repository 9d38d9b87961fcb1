//! Telemetry publisher tasks
//!
//! Each publisher periodically snapshots the telemetry store and hands a
//! serialized frame to its transport link. A busy store means the cycle
//! is skipped, never a partial snapshot.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};

use tailwind_core::telemetry::TelemetryStore;

use crate::link::{DebugLink, TelemetryLink};

/// 2 Hz, matching the status page refresh budget
const WIRELESS_PERIOD: Duration = Duration::from_millis(2000);

/// Low-energy notifications go out faster
const LOW_ENERGY_PERIOD: Duration = Duration::from_millis(500);

/// Wireless (status page) telemetry publisher
#[embassy_executor::task]
pub async fn wireless_publisher_task(
    store: &'static TelemetryStore<CriticalSectionRawMutex>,
    link: DebugLink,
) {
    let mut link = link;
    run_publisher(store, &mut link, WIRELESS_PERIOD, "wireless").await
}

/// Low-energy telemetry/control publisher
#[embassy_executor::task]
pub async fn low_energy_publisher_task(
    store: &'static TelemetryStore<CriticalSectionRawMutex>,
    link: DebugLink,
) {
    let mut link = link;
    run_publisher(store, &mut link, LOW_ENERGY_PERIOD, "low-energy").await
}

async fn run_publisher<L: TelemetryLink>(
    store: &'static TelemetryStore<CriticalSectionRawMutex>,
    link: &mut L,
    period: Duration,
    label: &'static str,
) -> ! {
    info!("{} publisher started", label);
    link.on_connect();

    let mut ticker = Ticker::every(period);

    loop {
        if let Some(snapshot) = store.snapshot().await {
            match postcard::to_vec::<_, 128>(&snapshot) {
                Ok(frame) => link.write_frame(&frame),
                Err(_) => warn!("{}: snapshot serialization failed", label),
            }
        } else {
            trace!("{}: store busy, skipping cycle", label);
        }

        ticker.next().await;
    }
}
