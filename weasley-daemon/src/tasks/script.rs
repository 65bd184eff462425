//! Script replay task

use embassy_time::{Duration, Timer};
use log::{info, warn};

use crate::channels::{InboundMessage, INGRESS};
use crate::script::ScriptStep;

/// Replay script steps into the ingress channel
///
/// Sends wait for queue space, so a script never drops messages.
#[embassy_executor::task]
pub async fn script_task(steps: Vec<ScriptStep>) {
    info!("Replaying script ({} steps)", steps.len());

    for step in steps {
        match step {
            ScriptStep::Send { topic, payload } => {
                INGRESS.send(InboundMessage::new(topic, payload)).await;
            }
            ScriptStep::Sleep { ms } => Timer::after(Duration::from_millis(ms)).await,
            ScriptStep::Range(range) => {
                for value in range.values() {
                    match range.payload(value) {
                        Ok(payload) => {
                            INGRESS.send(InboundMessage::new(range.topic.clone(), payload)).await;
                        }
                        Err(e) => warn!("Could not encode range message: {}", e),
                    }
                    Timer::after(Duration::from_millis(range.pause_ms)).await;
                }
            }
            ScriptStep::Unknown(kind) => warn!("Skipping script entry of unknown type '{}'", kind),
        }
    }

    info!("Script finished");
}
