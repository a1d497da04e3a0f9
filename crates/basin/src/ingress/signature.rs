//! Webhook signature validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header prefix for the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify an `X-Signature-256` header against the raw request body.
///
/// Recomputes HMAC-SHA256 over `body` with the shared secret and compares
/// against the hex digest in constant time. Any malformed header fails
/// closed.
#[must_use]
pub fn verify_signature(secret: &[u8], body: &[u8], header: &str) -> bool {
    let Some(hex_digest) = header.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(claimed) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&claimed).is_ok()
}

/// Compute the signature header value for a body (used by tests and by
/// outbound deliveries basin itself makes).
#[must_use]
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}
