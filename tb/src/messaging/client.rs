//! MessagingGateway trait definition

use async_trait::async_trait;

use super::{MAX_TEXT_CHARS, MessagingError};

/// Outbound text messages to chat users
///
/// Implementations reject blank text, blank tokens, and blank user ids before
/// touching the network, and make exactly one request per send otherwise.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Answer an event using its single-use reply token
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError>;

    /// Send a message to a user at any time
    async fn push(&self, user_id: &str, text: &str) -> Result<(), MessagingError>;
}

/// Check a send request before it goes out
pub fn check_outbound(target: &str, target_name: &'static str, text: &str) -> Result<(), MessagingError> {
    if target.trim().is_empty() {
        return Err(MessagingError::MissingTarget(target_name));
    }
    if text.trim().is_empty() {
        return Err(MessagingError::EmptyText);
    }
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(MessagingError::TextTooLong(chars));
    }
    Ok(())
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tracing::debug;

    /// Recorded send
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SentMessage {
        Reply { reply_token: String, text: String },
        Push { user_id: String, text: String },
    }

    /// Mock gateway for unit tests
    #[derive(Default)]
    pub struct MockGateway {
        sent: Mutex<Vec<SentMessage>>,
        call_count: AtomicUsize,
        fail: AtomicBool,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let mock = Self::default();
            mock.fail.store(true, Ordering::SeqCst);
            mock
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn sent(&self) -> Vec<SentMessage> {
            self.sent.lock().unwrap().clone()
        }

        fn record(&self, message: SentMessage) -> Result<(), MessagingError> {
            debug!(?message, "MockGateway: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(MessagingError::ApiError {
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[async_trait]
    impl MessagingGateway for MockGateway {
        async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
            check_outbound(reply_token, "reply token", text)?;
            self.record(SentMessage::Reply {
                reply_token: reply_token.to_string(),
                text: text.to_string(),
            })
        }

        async fn push(&self, user_id: &str, text: &str) -> Result<(), MessagingError> {
            check_outbound(user_id, "user id", text)?;
            self.record(SentMessage::Push {
                user_id: user_id.to_string(),
                text: text.to_string(),
            })
        }
    }
}
