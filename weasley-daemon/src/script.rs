//! Message replay scripts
//!
//! A script is a JSON array of entries:
//!
//! ```json
//! [
//!   {"msg": {"state": "home"}},
//!   {"topic": "weasleyclock/fred", "msg": {"state": "work"}},
//!   {"type": "sleep", "time": 2},
//!   {"type": "range", "msg": {"state": "intransit"}, "range": [50, 0, -5], "sleep": 0.5}
//! ]
//! ```
//!
//! A range entry sends `msg` once per value of `range(start, stop, step)`,
//! with `range_key` (default `distance`) set to the value. Ranges are
//! expanded while replaying, not when the script is loaded.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Topic used when an entry does not name one
pub const DEFAULT_TOPIC: &str = "weasleyclock/susan";

const DEFAULT_SLEEP_S: f64 = 1.0;
const DEFAULT_RANGE: (i64, i64, i64) = (50, 0, -1);
const DEFAULT_RANGE_KEY: &str = "distance";
const DEFAULT_RANGE_SLEEP_S: f64 = 0.1;

/// Errors loading a script (fatal at startup)
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entry {0} has no 'msg'")]
    MissingMessage(usize),
    #[error("entry {0}: range messages must be JSON objects")]
    RangeMessage(usize),
    #[error("entry {0}: range step must not be zero")]
    ZeroStep(usize),
    #[error("entry {0}: sleep time must be a non-negative number of seconds")]
    SleepTime(usize),
}

/// One replay action
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Send { topic: String, payload: Vec<u8> },
    Sleep { ms: u64 },
    /// Repeated send, expanded while replaying
    Range(RangeStep),
    /// Entry with an unrecognised type, reported when reached
    Unknown(String),
}

/// A message template sent once per value of `range(start, stop, step)`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStep {
    pub topic: String,
    template: Map<String, Value>,
    key: String,
    start: i64,
    stop: i64,
    step: i64,
    /// Pause after each send
    pub pause_ms: u64,
}

impl RangeStep {
    /// Values of the range, end exclusive, produced on demand
    pub fn values(&self) -> impl Iterator<Item = i64> {
        let (start, stop, step) = (self.start, self.stop, self.step);
        std::iter::successors(Some(start), move |v| v.checked_add(step)).take_while(move |v| {
            match step.signum() {
                1 => *v < stop,
                -1 => *v > stop,
                _ => false,
            }
        })
    }

    /// Payload for one value of the range
    pub fn payload(&self, value: i64) -> Result<Vec<u8>, serde_json::Error> {
        let mut msg = self.template.clone();
        msg.insert(self.key.clone(), Value::from(value));
        serde_json::to_vec(&Value::Object(msg))
    }
}

#[derive(Debug, Deserialize)]
struct Entry {
    topic: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    msg: Option<Value>,
    time: Option<f64>,
    range_key: Option<String>,
    range: Option<(i64, i64, i64)>,
    sleep: Option<f64>,
}

/// Load a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    parse_script(&fs::read_to_string(path)?)
}

/// Parse a script document into a flat list of steps
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let entries: Vec<Entry> = serde_json::from_str(text)?;
    let mut steps = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let topic = entry.topic.as_deref().unwrap_or(DEFAULT_TOPIC);

        match entry.kind.as_deref() {
            None => {
                let msg = entry.msg.as_ref().ok_or(ScriptError::MissingMessage(index))?;
                steps.push(send(topic, msg)?);
            }
            Some("sleep") => {
                let seconds = entry.time.unwrap_or(DEFAULT_SLEEP_S);
                steps.push(sleep(index, seconds)?);
            }
            Some("range") => {
                let Some(Value::Object(template)) = entry.msg.as_ref() else {
                    return Err(match entry.msg {
                        None => ScriptError::MissingMessage(index),
                        Some(_) => ScriptError::RangeMessage(index),
                    });
                };
                let (start, stop, step) = entry.range.unwrap_or(DEFAULT_RANGE);
                if step == 0 {
                    return Err(ScriptError::ZeroStep(index));
                }
                let seconds = entry.sleep.unwrap_or(DEFAULT_RANGE_SLEEP_S);

                steps.push(ScriptStep::Range(RangeStep {
                    topic: topic.to_string(),
                    template: template.clone(),
                    key: entry
                        .range_key
                        .unwrap_or_else(|| DEFAULT_RANGE_KEY.to_string()),
                    start,
                    stop,
                    step,
                    pause_ms: millis(index, seconds)?,
                }));
            }
            Some(other) => steps.push(ScriptStep::Unknown(other.to_string())),
        }
    }

    Ok(steps)
}

fn send(topic: &str, msg: &Value) -> Result<ScriptStep, ScriptError> {
    Ok(ScriptStep::Send {
        topic: topic.to_string(),
        payload: serde_json::to_vec(msg)?,
    })
}

fn sleep(index: usize, seconds: f64) -> Result<ScriptStep, ScriptError> {
    Ok(ScriptStep::Sleep {
        ms: millis(index, seconds)?,
    })
}

fn millis(index: usize, seconds: f64) -> Result<u64, ScriptError> {
    if !(seconds >= 0.0) || !seconds.is_finite() {
        return Err(ScriptError::SleepTime(index));
    }
    Ok((seconds * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(step: &ScriptStep) -> Value {
        match step {
            ScriptStep::Send { payload, .. } => serde_json::from_slice(payload).unwrap(),
            other => panic!("expected a send, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_messages() {
        let steps = parse_script(
            r#"[
                {"msg": {"state": "home"}},
                {"topic": "weasleyclock/fred", "msg": {"state": "work", "distance": 3}}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 2);
        let ScriptStep::Send { topic, .. } = &steps[0] else {
            panic!("expected a send");
        };
        assert_eq!(topic, DEFAULT_TOPIC);
        assert_eq!(payload(&steps[0])["state"], "home");

        let ScriptStep::Send { topic, .. } = &steps[1] else {
            panic!("expected a send");
        };
        assert_eq!(topic, "weasleyclock/fred");
        assert_eq!(payload(&steps[1])["distance"], 3);
    }

    #[test]
    fn test_sleep() {
        let steps =
            parse_script(r#"[{"type": "sleep", "time": 2.5}, {"type": "sleep"}]"#).unwrap();
        assert_eq!(
            steps,
            [ScriptStep::Sleep { ms: 2500 }, ScriptStep::Sleep { ms: 1000 }]
        );

        assert!(matches!(
            parse_script(r#"[{"type": "sleep", "time": -1}]"#),
            Err(ScriptError::SleepTime(0))
        ));
    }

    fn range(step: &ScriptStep) -> &RangeStep {
        match step {
            ScriptStep::Range(range) => range,
            other => panic!("expected a range, got {other:?}"),
        }
    }

    fn range_payload(range: &RangeStep, value: i64) -> Value {
        serde_json::from_slice(&range.payload(value).unwrap()).unwrap()
    }

    #[test]
    fn test_range() {
        let steps = parse_script(
            r#"[{"type": "range", "msg": {"state": "intransit"}, "range": [10, 0, -4], "sleep": 0.5}]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 1);

        let range = range(&steps[0]);
        assert_eq!(range.topic, DEFAULT_TOPIC);
        assert_eq!(range.pause_ms, 500);
        assert!(range.values().eq([10, 6, 2]));

        let msg = range_payload(range, 6);
        assert_eq!(msg["distance"], 6);
        assert_eq!(msg["state"], "intransit");
    }

    #[test]
    fn test_range_defaults() {
        let steps =
            parse_script(r#"[{"type": "range", "range_key": "speed", "msg": {"state": "lost"}}]"#)
                .unwrap();
        let range = range(&steps[0]);

        // 50 down to 1
        assert_eq!(range.values().count(), 50);
        assert_eq!(range.values().last(), Some(1));
        assert_eq!(range_payload(range, 50)["speed"], 50);
        assert_eq!(range.pause_ms, 100);
    }

    #[test]
    fn test_huge_range_is_not_expanded() {
        let steps = parse_script(
            r#"[{"type": "range", "msg": {"state": "lost"}, "range": [0, 2000000000, 1]}]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 1);
        assert!(range(&steps[0]).values().take(3).eq([0, 1, 2]));

        // Stops at the integer limit instead of wrapping
        let steps = parse_script(&format!(
            r#"[{{"type": "range", "msg": {{}}, "range": [{}, {}, 1]}}]"#,
            i64::MAX - 1,
            i64::MAX
        ))
        .unwrap();
        assert!(range(&steps[0]).values().eq([i64::MAX - 1]));
    }

    #[test]
    fn test_empty_and_bad_ranges() {
        let steps =
            parse_script(r#"[{"type": "range", "msg": {}, "range": [0, 5, -1]}]"#).unwrap();
        assert_eq!(range(&steps[0]).values().count(), 0);

        assert!(matches!(
            parse_script(r#"[{"type": "range", "msg": {}, "range": [0, 5, 0]}]"#),
            Err(ScriptError::ZeroStep(0))
        ));
        assert!(matches!(
            parse_script(r#"[{"msg": {}}, {"type": "range", "msg": "home"}]"#),
            Err(ScriptError::RangeMessage(1))
        ));
        assert!(matches!(
            parse_script(r#"[{"topic": "weasleyclock/fred"}]"#),
            Err(ScriptError::MissingMessage(0))
        ));
    }

    #[test]
    fn test_unknown_type_kept() {
        let steps = parse_script(r#"[{"type": "teleport"}, {"msg": {"state": "home"}}]"#).unwrap();
        assert_eq!(steps[0], ScriptStep::Unknown("teleport".into()));
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            parse_script(r#"{"msg": {}}"#),
            Err(ScriptError::Parse(_))
        ));
    }
}
