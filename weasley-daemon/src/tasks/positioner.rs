//! Positioner task
//!
//! Runs one scheduler pass per tick against the shared hand states.

use log::info;

use weasley_core::config::DialConfig;
use weasley_core::scheduler::PositioningScheduler;

use super::tick::TICK_SIGNAL;
use crate::actuator::Actuator;
use crate::channels::HAND_STATES;
use crate::report;

#[embassy_executor::task]
pub async fn positioner_task(config: &'static DialConfig, mut actuator: Actuator) {
    info!("Positioner task started");

    let scheduler = PositioningScheduler::new(config);

    loop {
        let now_ms = TICK_SIGNAL.wait().await;
        let tick = scheduler.tick(now_ms, &HAND_STATES, &mut actuator);
        report::log_tick(&tick);
    }
}
