//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use tailwind_core::telemetry::ControllerUpdate;

/// Channel capacity for PAS pulse timestamps
const PAS_CHANNEL_SIZE: usize = 8;

/// Channel capacity for decoded motor-controller telemetry
const CONTROLLER_CHANNEL_SIZE: usize = 4;

/// PAS pulse timestamps from the cadence sensor edges
pub static PAS_PULSES: Channel<CriticalSectionRawMutex, Instant, PAS_CHANNEL_SIZE> =
    Channel::new();

/// Decoded motor-controller telemetry from the (external) driver
pub static CONTROLLER_TELEMETRY: Channel<
    CriticalSectionRawMutex,
    ControllerUpdate,
    CONTROLLER_CHANNEL_SIZE,
> = Channel::new();

/// Assist mode selection from the wireless control path (opaque index)
pub static MODE_SELECT: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Motor enable/disable request from the wireless control path
pub static MOTOR_ENABLE: Signal<CriticalSectionRawMutex, bool> = Signal::new();
