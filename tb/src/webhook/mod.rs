//! Inbound webhook handling
//!
//! Requests are authenticated by [`signature::validate`] before any event is
//! decoded, then dispatched through [`EventHandler`].

mod events;
mod handler;
pub mod signature;

pub use events::{EventMessage, EventSource, FollowEvent, MessageEvent, UnfollowEvent, WebhookBody, WebhookEvent};
pub use handler::{BotMessages, EventHandler, EventOutcome};
pub use signature::{ChannelSecret, SIGNATURE_HEADER};
