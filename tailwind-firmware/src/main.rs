//! Tailwind - Pedal-Assist E-Bike Controller Firmware
//!
//! Main firmware binary for RP2040-based controller boards. The
//! real-time control loop (torque calibration/evaluation, cadence,
//! sensor telemetry) owns core 0; the motor-controller telemetry
//! consumer and both wireless publishers run on core 1. The only shared
//! mutable state between the two cores is the telemetry store.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::adc::{
    Adc, Channel as AdcChannel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler,
};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tailwind_core::config::STORE_LOCK_TIMEOUT_MS;
use tailwind_core::telemetry::TelemetryStore;

mod channels;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

// Constructed once at startup and handed to every producer/consumer task.
static TELEMETRY: StaticCell<TelemetryStore<CriticalSectionRawMutex>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tailwind firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let store: &'static TelemetryStore<CriticalSectionRawMutex> =
        TELEMETRY.init(TelemetryStore::new(Duration::from_millis(
            STORE_LOCK_TIMEOUT_MS,
        )));

    // Torque sensor on ADC0 (GPIO26), PAS hall sensors on GPIO2/GPIO3.
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let torque_channel = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let pas_a = Input::new(p.PIN_2, Pull::Up);
    let pas_b = Input::new(p.PIN_3, Pull::Up);

    // Core 1: telemetry consumers, decoupled from the control loop.
    #[allow(static_mut_refs)]
    spawn_core1(p.CORE1, unsafe { &mut CORE1_STACK }, move || {
        let executor1 = EXECUTOR1.init(Executor::new());
        executor1.run(|spawner| {
            spawner.spawn(tasks::controller_poll_task(store)).unwrap();
            spawner
                .spawn(tasks::wireless_publisher_task(
                    store,
                    link::DebugLink::new("wireless"),
                ))
                .unwrap();
            spawner
                .spawn(tasks::low_energy_publisher_task(
                    store,
                    link::DebugLink::new("low-energy"),
                ))
                .unwrap();
        });
    });

    // Core 0: the real-time sensing path.
    spawner.spawn(tasks::pas_task(pas_a, pas_b)).unwrap();
    spawner
        .spawn(tasks::control_loop_task(
            adc,
            torque_channel,
            store,
            tasks::ControlLoopConfig::default(),
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
