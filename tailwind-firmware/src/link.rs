//! Outward telemetry link abstraction
//!
//! The publishers serialize a snapshot and hand the frame to whatever
//! transport is attached (BLE characteristic writes, the WiFi status
//! endpoint). Transports implement this small capability set; the wire
//! formats themselves live outside this firmware's scope.

use defmt::*;

/// Capability set a telemetry transport exposes to a publisher task
pub trait TelemetryLink {
    fn on_connect(&mut self) {}
    fn on_disconnect(&mut self) {}
    /// Hand one serialized snapshot frame to the transport
    fn write_frame(&mut self, frame: &[u8]);
}

/// Link that logs frames over RTT, used until a radio transport attaches
pub struct DebugLink {
    label: &'static str,
}

impl DebugLink {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl TelemetryLink for DebugLink {
    fn on_connect(&mut self) {
        info!("{}: telemetry link up", self.label);
    }

    fn write_frame(&mut self, frame: &[u8]) {
        trace!("{}: frame of {} bytes", self.label, frame.len());
    }
}
