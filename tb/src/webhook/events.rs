//! Inbound webhook payload types
//!
//! The body is parsed in two passes: the envelope first, then each event on
//! its own, so one malformed event does not drop its siblings.

use serde::Deserialize;
use tracing::warn;

/// Top-level webhook request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookBody {
    /// Bot user id the events were sent to
    pub destination: Option<String>,
    pub events: Vec<serde_json::Value>,
}

impl WebhookBody {
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Decode each event, skipping any that fail to parse
    pub fn decoded_events(&self) -> Vec<WebhookEvent> {
        self.events
            .iter()
            .filter_map(|raw| match serde_json::from_value::<WebhookEvent>(raw.clone()) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "decoded_events: skipping malformed event");
                    None
                }
            })
            .collect()
    }
}

/// One webhook event, keyed by its `type` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Follow(FollowEvent),
    Unfollow(UnfollowEvent),
    Message(MessageEvent),
    #[serde(other)]
    Unknown,
}

impl WebhookEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Follow(_) => "follow",
            Self::Unfollow(_) => "unfollow",
            Self::Message(_) => "message",
            Self::Unknown => "unknown",
        }
    }
}

/// Who triggered an event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// "user", "group" or "room"
    #[serde(rename = "type", default)]
    pub kind: String,
    pub user_id: Option<String>,
}

/// A user added the bot as a friend (or unblocked it)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowEvent {
    pub reply_token: Option<String>,
    pub timestamp: i64,
    pub source: Option<EventSource>,
}

impl FollowEvent {
    /// The follower's user id, if present and non-blank
    pub fn user_id(&self) -> Option<&str> {
        user_id(self.source.as_ref())
    }

    pub fn reply_token(&self) -> Option<&str> {
        self.reply_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A user blocked the bot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnfollowEvent {
    pub timestamp: i64,
    pub source: Option<EventSource>,
}

impl UnfollowEvent {
    pub fn user_id(&self) -> Option<&str> {
        user_id(self.source.as_ref())
    }
}

/// A user sent the bot a message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub source: Option<EventSource>,
    pub message: EventMessage,
}

impl MessageEvent {
    pub fn reply_token(&self) -> Option<&str> {
        self.reply_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Message payload; only text is inspected
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventMessage {
    Text {
        #[serde(default)]
        id: String,
        text: String,
    },
    #[serde(other)]
    Other,
}

fn user_id(source: Option<&EventSource>) -> Option<&str> {
    source
        .and_then(|s| s.user_id.as_deref())
        .filter(|id| !id.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_follow_event() {
        let body = br#"{
            "destination": "Ubot",
            "events": [{
                "type": "follow",
                "mode": "active",
                "timestamp": 1700000000000,
                "source": {"type": "user", "userId": "U123"},
                "replyToken": "rt-1",
                "webhookEventId": "01H"
            }]
        }"#;

        let parsed = WebhookBody::parse(body).unwrap();
        assert_eq!(parsed.destination.as_deref(), Some("Ubot"));

        let events = parsed.decoded_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            WebhookEvent::Follow(follow) => {
                assert_eq!(follow.user_id(), Some("U123"));
                assert_eq!(follow.reply_token(), Some("rt-1"));
                assert_eq!(follow.timestamp, 1_700_000_000_000);
            }
            other => panic!("expected follow, got {:?}", other),
        }
    }

    #[test]
    fn test_follow_without_source() {
        let body = br#"{"events":[{"type":"follow","timestamp":1}]}"#;
        let events = WebhookBody::parse(body).unwrap().decoded_events();

        let WebhookEvent::Follow(follow) = &events[0] else {
            panic!("expected follow");
        };
        assert_eq!(follow.user_id(), None);
        assert_eq!(follow.reply_token(), None);
    }

    #[test]
    fn test_blank_ids_are_absent() {
        let body = br#"{"events":[{"type":"follow","replyToken":" ","source":{"type":"user","userId":""}}]}"#;
        let events = WebhookBody::parse(body).unwrap().decoded_events();

        let WebhookEvent::Follow(follow) = &events[0] else {
            panic!("expected follow");
        };
        assert_eq!(follow.user_id(), None);
        assert_eq!(follow.reply_token(), None);
    }

    #[test]
    fn test_text_and_other_messages() {
        let body = br#"{"events":[
            {"type":"message","replyToken":"rt","source":{"type":"user","userId":"U1"},
             "message":{"type":"text","id":"m1","text":"hello"}},
            {"type":"message","replyToken":"rt2","message":{"type":"sticker","id":"m2","packageId":"1"}}
        ]}"#;
        let events = WebhookBody::parse(body).unwrap().decoded_events();
        assert_eq!(events.len(), 2);

        let WebhookEvent::Message(first) = &events[0] else {
            panic!("expected message");
        };
        assert_eq!(
            first.message,
            EventMessage::Text {
                id: "m1".to_string(),
                text: "hello".to_string()
            }
        );

        let WebhookEvent::Message(second) = &events[1] else {
            panic!("expected message");
        };
        assert_eq!(second.message, EventMessage::Other);
    }

    #[test]
    fn test_unknown_event_type() {
        let body = br#"{"events":[{"type":"postback","replyToken":"rt","postback":{"data":"x"}}]}"#;
        let events = WebhookBody::parse(body).unwrap().decoded_events();
        assert_eq!(events, vec![WebhookEvent::Unknown]);
        assert_eq!(events[0].kind(), "unknown");
    }

    #[test]
    fn test_malformed_event_is_skipped() {
        // message event without a message payload
        let body = br#"{"events":[{"type":"message"},{"type":"unfollow","source":{"type":"user","userId":"U9"}}]}"#;
        let events = WebhookBody::parse(body).unwrap().decoded_events();
        assert_eq!(events.len(), 1);

        let WebhookEvent::Unfollow(unfollow) = &events[0] else {
            panic!("expected unfollow");
        };
        assert_eq!(unfollow.user_id(), Some("U9"));
    }

    #[test]
    fn test_empty_body_object() {
        let parsed = WebhookBody::parse(b"{}").unwrap();
        assert!(parsed.decoded_events().is_empty());
        assert!(WebhookBody::parse(b"not json").is_err());
    }
}
