//! Log reporting for ingress and tick outcomes
//!
//! Maps the core severities onto `log` levels. Repeated faults are
//! demoted to trace so a stuck hand does not flood the log every tick.

use log::{debug, info, log, trace, Level};

use weasley_core::error::{IngestError, Severity};
use weasley_core::ingress::IngestOutcome;
use weasley_core::scheduler::{TickOutcome, TickReport};

/// Log level for a core severity
pub fn level(severity: Severity) -> Level {
    match severity {
        Severity::Debug => Level::Debug,
        Severity::Info => Level::Info,
        Severity::Warning => Level::Warn,
        Severity::Error => Level::Error,
    }
}

/// Level a tick outcome is logged at
pub fn outcome_level(outcome: &TickOutcome) -> Level {
    match outcome {
        TickOutcome::Moved(cmd) if cmd.changed => Level::Info,
        TickOutcome::Moved(_) => Level::Debug,
        TickOutcome::Throttled { .. } => Level::Trace,
        TickOutcome::Failed { fresh: false, .. } => Level::Trace,
        TickOutcome::Failed { error, .. } => level(error.severity()),
    }
}

/// Log every outcome of a tick
pub fn log_tick(report: &TickReport) {
    for outcome in report.outcomes() {
        let lvl = outcome_level(outcome);
        match outcome {
            TickOutcome::Moved(cmd) => log!(
                lvl,
                "Move [{}] hand {} to [{}] angle {} on channel {} ({:.1} miles away)",
                cmd.person,
                cmd.hand,
                cmd.zone,
                cmd.angle,
                cmd.channel,
                cmd.distance
            ),
            TickOutcome::Throttled { person } => {
                log!(lvl, "[{}] waiting for zone update delay", person)
            }
            TickOutcome::Failed { person, error, .. } => {
                log!(lvl, "[{}] hand not moved: {:?}", person, error)
            }
        }
    }
}

/// Log the result of ingesting one message
pub fn log_ingest(person: &str, result: &Result<IngestOutcome, IngestError>) {
    match result {
        Ok(IngestOutcome::Recorded { zone, distance }) => {
            info!("[{}] reported [{}] ({:.1} miles away)", person, zone, distance)
        }
        Ok(IngestOutcome::NoZone) => debug!("[{}] report without a zone ignored", person),
        Err(e) => log!(level(e.severity()), "[{}] report rejected: {:?}", person, e),
    }
}

/// Log a message on a topic the clock does not handle
pub fn log_ignored_topic(topic: &str) {
    trace!("Ignoring message on topic '{}'", topic);
}
