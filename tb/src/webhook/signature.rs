//! Webhook signature validation
//!
//! The platform signs every webhook body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in `x-line-signature`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, error};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Channel secret used as the signing key
///
/// Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelSecret(String);

impl ChannelSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ChannelSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChannelSecret(***)")
    }
}

fn digest(body: &[u8], secret: &str) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!(error = %e, "signature: key rejected");
            return None;
        }
    };
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Compute the signature the platform would send for `body`
///
/// Returns an empty string if the key is rejected; an empty signature never
/// validates.
pub fn sign(body: &[u8], secret: &str) -> String {
    digest(body, secret).unwrap_or_default()
}

/// Check a received signature against the body
///
/// Fails closed: an empty secret, an empty signature, or any internal error
/// yields `false`.
pub fn validate(body: &[u8], signature: &str, secret: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        debug!("validate: empty secret or signature");
        return false;
    }

    match digest(body, secret) {
        Some(expected) => expected.as_bytes() == signature.as_bytes(),
        None => false,
    }
}
