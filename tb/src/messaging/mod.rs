//! Outbound messaging to chat users
//!
//! This module provides the MessagingGateway trait and its LINE Messaging
//! API implementation.

pub mod client;
mod error;
mod line;

pub use client::{MessagingGateway, check_outbound};
pub use error::MessagingError;
pub use line::LineMessagingClient;

/// Platform limit on characters in one text message
pub const MAX_TEXT_CHARS: usize = 5000;
