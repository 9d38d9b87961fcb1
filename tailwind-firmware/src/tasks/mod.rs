//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The control loop and PAS edge watcher run on core 0; the controller
//! driver consumer and both telemetry publishers run on core 1.

pub mod control_loop;
pub mod controller_poll;
pub mod pas;
pub mod publisher;

pub use control_loop::{control_loop_task, ControlLoopConfig};
pub use controller_poll::controller_poll_task;
pub use pas::pas_task;
pub use publisher::{low_energy_publisher_task, wireless_publisher_task};
