//! Shared telemetry: snapshot data model and the cross-task store

pub mod snapshot;
pub mod store;

pub use snapshot::{ControllerGroup, PowerGroup, SensorGroup, TelemetrySnapshot};
pub use store::{ControllerUpdate, SensorUpdate, TelemetryStore};
