//! Ingress task
//!
//! Drains the ingress channel and writes reports into the hand states.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;
use log::{debug, info};

use weasley_core::config::DialConfig;
use weasley_core::error::IngestError;
use weasley_core::ingress::{IngestOutcome, IngressAdapter};
use weasley_protocol::Topic;

use crate::channels::{InboundMessage, HAND_STATES, INGRESS};
use crate::report;

/// What the ingress task did with one message
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Refresh request from a clock, not a location
    UpdateRequest,
    /// Topic without a person segment
    InvalidTopic,
    /// Location report for a person
    Report(Result<IngestOutcome, IngestError>),
}

#[embassy_executor::task]
pub async fn ingress_task(config: &'static DialConfig) {
    info!("Ingress task started");

    let adapter = IngressAdapter::new(config, &HAND_STATES);

    loop {
        let message = INGRESS.receive().await;
        handle(&adapter, &message, Instant::now().as_millis());
    }
}

/// Classify and ingest one message, logging the result
pub fn handle<M: RawMutex>(
    adapter: &IngressAdapter<'_, M>,
    message: &InboundMessage,
    now_ms: u64,
) -> Handled {
    match Topic::parse(&message.topic) {
        Some(Topic::UpdateRequest) => {
            debug!("Ignoring refresh request on '{}'", message.topic);
            Handled::UpdateRequest
        }
        Some(Topic::Person(person)) => {
            let result = adapter.ingest(person, &message.payload, now_ms);
            report::log_ingest(person, &result);
            Handled::Report(result)
        }
        None => {
            report::log_ignored_topic(&message.topic);
            Handled::InvalidTopic
        }
    }
}
