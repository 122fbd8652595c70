//! Webhook event handling

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use tripplan::FailurePolicy;

use super::events::{EventMessage, FollowEvent, MessageEvent, UnfollowEvent, WebhookEvent};
use crate::messaging::MessagingGateway;

/// What handling one event amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// A message was delivered
    Sent,
    /// Nothing to do for this event
    Skipped(String),
    /// A send was attempted and failed
    Failed(String),
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::Skipped(reason) => write!(f, "skipped: {}", reason),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Messages the bot sends on its own
#[derive(Debug, Clone)]
pub struct BotMessages {
    pub welcome: String,
    pub help: String,
}

/// Dispatches decoded webhook events
///
/// Send failures never propagate: each call site applies the handler's
/// failure policy and the event resolves to an outcome.
pub struct EventHandler {
    gateway: Arc<dyn MessagingGateway>,
    messages: BotMessages,
    policy: FailurePolicy,
}

impl EventHandler {
    pub fn new(gateway: Arc<dyn MessagingGateway>, messages: BotMessages) -> Self {
        Self {
            gateway,
            messages,
            policy: FailurePolicy::LogAndContinue,
        }
    }

    /// Override the policy applied to send failures
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn handle(&self, event: &WebhookEvent) -> EventOutcome {
        debug!(kind = event.kind(), "handle: called");
        let outcome = match event {
            WebhookEvent::Follow(follow) => self.handle_follow(follow).await,
            WebhookEvent::Unfollow(unfollow) => self.handle_unfollow(unfollow),
            WebhookEvent::Message(message) => self.handle_message(message).await,
            WebhookEvent::Unknown => {
                debug!("handle: ignoring unsupported event type");
                EventOutcome::Skipped("unsupported event type".to_string())
            }
        };
        info!(kind = event.kind(), %outcome, "handle: done");
        outcome
    }

    /// Handle events in order, one outcome per event
    pub async fn handle_all(&self, events: &[WebhookEvent]) -> Vec<EventOutcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.handle(event).await);
        }
        outcomes
    }

    /// Greet a new follower
    ///
    /// Replies when the event carries a reply token and pushes otherwise. An
    /// event without a user id is skipped with no side effects.
    pub async fn handle_follow(&self, event: &FollowEvent) -> EventOutcome {
        debug!(timestamp = event.timestamp, "handle_follow: called");
        let Some(user_id) = event.user_id() else {
            info!("handle_follow: no user id on follow event, skipping");
            return EventOutcome::Skipped("missing user id".to_string());
        };

        let text = &self.messages.welcome;
        let result = match event.reply_token() {
            Some(token) => self.gateway.reply(token, text).await,
            None => self.gateway.push(user_id, text).await,
        };
        self.resolve("welcome message", result)
    }

    fn handle_unfollow(&self, event: &UnfollowEvent) -> EventOutcome {
        info!(user_id = event.user_id().unwrap_or("-"), "handle_unfollow: user unfollowed");
        EventOutcome::Skipped("unfollow".to_string())
    }

    async fn handle_message(&self, event: &MessageEvent) -> EventOutcome {
        if !matches!(event.message, EventMessage::Text { .. }) {
            return EventOutcome::Skipped("non-text message".to_string());
        }
        let Some(token) = event.reply_token() else {
            return EventOutcome::Skipped("missing reply token".to_string());
        };

        let result = self.gateway.reply(token, &self.messages.help).await;
        self.resolve("help reply", result)
    }

    fn resolve<E: fmt::Display>(&self, context: &str, result: Result<(), E>) -> EventOutcome {
        match self.policy.apply(context, result) {
            Ok(Some(())) => EventOutcome::Sent,
            Ok(None) => EventOutcome::Failed(format!("{} not delivered", context)),
            Err(e) => EventOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::client::mock::{MockGateway, SentMessage};
    use crate::webhook::events::EventSource;

    fn messages() -> BotMessages {
        BotMessages {
            welcome: "welcome!".to_string(),
            help: "help!".to_string(),
        }
    }

    fn source(user_id: Option<&str>) -> Option<EventSource> {
        Some(EventSource {
            kind: "user".to_string(),
            user_id: user_id.map(String::from),
        })
    }

    fn follow(user_id: Option<&str>, reply_token: Option<&str>) -> FollowEvent {
        FollowEvent {
            reply_token: reply_token.map(String::from),
            timestamp: 1,
            source: source(user_id),
        }
    }

    #[tokio::test]
    async fn test_follow_without_user_id_sends_nothing() {
        let gateway = Arc::new(MockGateway::new());
        let handler = EventHandler::new(gateway.clone(), messages());

        let outcome = handler.handle_follow(&follow(None, Some("rt"))).await;

        assert_eq!(outcome, EventOutcome::Skipped("missing user id".to_string()));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_follow_with_reply_token_replies() {
        let gateway = Arc::new(MockGateway::new());
        let handler = EventHandler::new(gateway.clone(), messages());

        let outcome = handler.handle_follow(&follow(Some("U1"), Some("rt-1"))).await;

        assert_eq!(outcome, EventOutcome::Sent);
        assert_eq!(
            gateway.sent(),
            vec![SentMessage::Reply {
                reply_token: "rt-1".to_string(),
                text: "welcome!".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_follow_without_reply_token_pushes() {
        let gateway = Arc::new(MockGateway::new());
        let handler = EventHandler::new(gateway.clone(), messages());

        let outcome = handler.handle_follow(&follow(Some("U1"), None)).await;

        assert_eq!(outcome, EventOutcome::Sent);
        assert_eq!(
            gateway.sent(),
            vec![SentMessage::Push {
                user_id: "U1".to_string(),
                text: "welcome!".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let gateway = Arc::new(MockGateway::failing());
        let handler = EventHandler::new(gateway.clone(), messages());

        let outcome = handler.handle_follow(&follow(Some("U1"), Some("rt"))).await;

        assert_eq!(outcome, EventOutcome::Failed("welcome message not delivered".to_string()));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_abort_policy_reports_error_text() {
        let gateway = Arc::new(MockGateway::failing());
        let handler = EventHandler::new(gateway.clone(), messages()).with_policy(FailurePolicy::LogAndAbort);

        let outcome = handler.handle_follow(&follow(Some("U1"), None)).await;

        assert_eq!(outcome, EventOutcome::Failed("API error 500: mock failure".to_string()));
    }

    #[tokio::test]
    async fn test_text_message_gets_help_reply() {
        let gateway = Arc::new(MockGateway::new());
        let handler = EventHandler::new(gateway.clone(), messages());
        let event = WebhookEvent::Message(MessageEvent {
            reply_token: Some("rt-9".to_string()),
            timestamp: 1,
            source: source(Some("U1")),
            message: EventMessage::Text {
                id: "m".to_string(),
                text: "hi".to_string(),
            },
        });

        assert_eq!(handler.handle(&event).await, EventOutcome::Sent);
        assert_eq!(
            gateway.sent(),
            vec![SentMessage::Reply {
                reply_token: "rt-9".to_string(),
                text: "help!".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_non_text_and_unknown_events_are_skipped() {
        let gateway = Arc::new(MockGateway::new());
        let handler = EventHandler::new(gateway.clone(), messages());
        let sticker = WebhookEvent::Message(MessageEvent {
            reply_token: Some("rt".to_string()),
            timestamp: 1,
            source: None,
            message: EventMessage::Other,
        });
        let unfollow = WebhookEvent::Unfollow(UnfollowEvent {
            timestamp: 1,
            source: source(Some("U1")),
        });

        let outcomes = handler.handle_all(&[sticker, unfollow, WebhookEvent::Unknown]).await;

        assert_eq!(
            outcomes,
            vec![
                EventOutcome::Skipped("non-text message".to_string()),
                EventOutcome::Skipped("unfollow".to_string()),
                EventOutcome::Skipped("unsupported event type".to_string()),
            ]
        );
        assert_eq!(gateway.call_count(), 0);
    }
}
