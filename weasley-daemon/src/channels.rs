//! Inter-task communication
//!
//! Static channels and shared state used by the embassy tasks and the
//! stdin reader thread.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use weasley_core::state::HandStateStore;

/// Ingress queue capacity; a full queue drops new messages
pub const INGRESS_QUEUE_SIZE: usize = 16;

/// One inbound message as received from the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Messages waiting for the ingress task
pub static INGRESS: Channel<CriticalSectionRawMutex, InboundMessage, INGRESS_QUEUE_SIZE> =
    Channel::new();

/// Latest state of every tracked hand
pub static HAND_STATES: HandStateStore<CriticalSectionRawMutex> = HandStateStore::new();
