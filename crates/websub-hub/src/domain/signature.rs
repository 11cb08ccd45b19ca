//! HMAC-SHA256 payload signing.
//!
//! The hash function is fixed to SHA-256; subscribers verify the
//! `X-Hub-Signature: sha256=<hex>` header against their own copy of the secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Algorithm prefix used in [`SIGNATURE_HEADER`].
pub const SIGNATURE_ALGORITHM: &str = "sha256";

/// Sign `payload` with `secret`, returning the lowercase hex digest.
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Full header value: `sha256=<hex>`.
pub fn signature_header_value(secret: &[u8], payload: &[u8]) -> String {
    format!("{SIGNATURE_ALGORITHM}={}", sign(secret, payload))
}
