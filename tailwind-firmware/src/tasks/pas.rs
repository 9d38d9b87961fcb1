//! PAS cadence sensor edge watcher
//!
//! Timestamps every edge from the two pedal-assist hall sensors and
//! forwards the instants to the control loop. The channel is
//! freshest-wins: losing a pulse under backpressure softens the cadence
//! estimate for one interval and nothing more.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use crate::channels::PAS_PULSES;

#[embassy_executor::task]
pub async fn pas_task(mut pin_a: Input<'static>, mut pin_b: Input<'static>) {
    info!("PAS task started");

    loop {
        select(pin_a.wait_for_any_edge(), pin_b.wait_for_any_edge()).await;
        let _ = PAS_PULSES.try_send(Instant::now());
    }
}
