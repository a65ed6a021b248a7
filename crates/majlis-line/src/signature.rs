//! `x-line-signature` verification
//!
//! The platform signs the raw request body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in the header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

/// Base64 HMAC-SHA256 of `body` under `channel_secret`.
pub fn compute_signature(channel_secret: &str, body: &[u8]) -> Option<String> {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return None;
    };
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Constant-time check of `signature` against the body digest.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let signature = signature.trim();
    if signature.is_empty() || channel_secret.is_empty() {
        return false;
    }

    let Ok(expected) = STANDARD.decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
