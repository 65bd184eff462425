//! Line-oriented message source
//!
//! Reads `<topic> <payload>` lines, the format `mosquitto_sub -v` prints,
//! on a dedicated thread and queues them for the ingress task. The bus
//! connection itself is left to whatever feeds stdin.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use embassy_sync::channel::TrySendError;
use log::{debug, info, warn};

use crate::channels::{InboundMessage, INGRESS};

/// Split a line into topic and payload
///
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (topic, payload) = match line.split_once(char::is_whitespace) {
        Some((topic, payload)) => (topic, payload.trim_start()),
        None => (line, ""),
    };
    Some(InboundMessage::new(topic, payload.as_bytes()))
}

/// Queue a message without waiting
///
/// Returns false if the queue was full and the message was dropped.
pub fn enqueue(message: InboundMessage) -> bool {
    match INGRESS.try_send(message) {
        Ok(()) => true,
        Err(TrySendError::Full(message)) => {
            warn!("Ingress queue full, dropping message on '{}'", message.topic);
            false
        }
    }
}

/// Start reading stdin on a background thread
pub fn spawn_stdin_reader() -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-source".into())
        .spawn(|| {
            info!("Reading messages from stdin");
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if let Some(message) = parse_line(&line) {
                            debug!("Received message on '{}'", message.topic);
                            enqueue(message);
                        }
                    }
                    Err(e) => {
                        warn!("Reading stdin failed: {}", e);
                        break;
                    }
                }
            }
            info!("stdin closed");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line(r#"weasleyclock/susan {"state": "home"}"#),
            Some(InboundMessage::new("weasleyclock/susan", r#"{"state": "home"}"#))
        );
        assert_eq!(
            parse_line("weasleyclock/UPDATE\t{\"update\":\"true\"}\n"),
            Some(InboundMessage::new("weasleyclock/UPDATE", r#"{"update":"true"}"#))
        );
        assert_eq!(
            parse_line("weasleyclock/susan"),
            Some(InboundMessage::new("weasleyclock/susan", ""))
        );
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_full_queue_drops() {
        while INGRESS.try_receive().is_ok() {}

        for i in 0..crate::channels::INGRESS_QUEUE_SIZE {
            assert!(enqueue(InboundMessage::new(format!("weasleyclock/p{i}"), "{}")));
        }
        assert!(!enqueue(InboundMessage::new("weasleyclock/late", "{}")));

        let first = INGRESS.try_receive().unwrap();
        assert_eq!(first.topic, "weasleyclock/p0");
        while INGRESS.try_receive().is_ok() {}
    }
}
