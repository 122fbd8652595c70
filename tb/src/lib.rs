//! TripBot - chat bot front end for the trip planner
//!
//! TripBot receives webhook calls from the messaging platform, greets new
//! followers, and serves place search to the plan-creation screens.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with env-var secrets
//! - [`cli`] - `tb` command definitions
//! - [`webhook`] - Signature validation, event decoding, event handling
//! - [`messaging`] - Outbound reply/push messages
//! - [`server`] - axum routes and shared state

pub mod cli;
pub mod config;
pub mod messaging;
pub mod server;
pub mod webhook;

// Re-export commonly used types
pub use config::Config;
pub use messaging::{LineMessagingClient, MessagingError, MessagingGateway};
pub use server::{AppState, router};
pub use webhook::{BotMessages, ChannelSecret, EventHandler, EventOutcome, WebhookEvent};
