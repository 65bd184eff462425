//! Topic classification
//!
//! Topics have the shape `<prefix>/<person>`. Everything after the first
//! `/` is the person name, so nested names are passed through unchanged.

/// Subscription filter used by the clock
pub const DEFAULT_SUBSCRIPTION: &str = "weasleyclock/#";

/// Topic a clock publishes to ask every tracker to resend its location
pub const UPDATE_TOPIC: &str = "weasleyclock/UPDATE";

/// Payload sent with [`UPDATE_TOPIC`]
pub const UPDATE_PAYLOAD: &str = r#"{"update":"true"}"#;

/// Name segment reserved for refresh requests
const UPDATE_NAME: &str = "UPDATE";

/// A classified inbound topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topic<'a> {
    /// Location report for the named person
    Person(&'a str),
    /// Refresh request published by a clock (ours or another one)
    UpdateRequest,
}

impl<'a> Topic<'a> {
    /// Classify a topic string
    ///
    /// Returns `None` when the topic has no `/` separator or the person
    /// segment is empty.
    pub fn parse(topic: &'a str) -> Option<Self> {
        let (_prefix, name) = topic.split_once('/')?;
        let name = name.trim();

        if name.is_empty() {
            return None;
        }

        if name == UPDATE_NAME {
            return Some(Topic::UpdateRequest);
        }

        Some(Topic::Person(name))
    }

    /// Person name, if this is a location report topic
    pub fn person(&self) -> Option<&'a str> {
        match self {
            Topic::Person(name) => Some(name),
            Topic::UpdateRequest => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_topic() {
        assert_eq!(
            Topic::parse("weasleyclock/susan"),
            Some(Topic::Person("susan"))
        );
        assert_eq!(Topic::parse("weasleyclock/susan").unwrap().person(), Some("susan"));
    }

    #[test]
    fn test_nested_name_is_kept() {
        assert_eq!(
            Topic::parse("weasleyclock/family/susan"),
            Some(Topic::Person("family/susan"))
        );
    }

    #[test]
    fn test_update_request() {
        assert_eq!(Topic::parse(UPDATE_TOPIC), Some(Topic::UpdateRequest));
        assert_eq!(Topic::UpdateRequest.person(), None);
    }

    #[test]
    fn test_invalid_topics() {
        assert_eq!(Topic::parse("weasleyclock"), None);
        assert_eq!(Topic::parse("weasleyclock/"), None);
        assert_eq!(Topic::parse(""), None);
    }
}
