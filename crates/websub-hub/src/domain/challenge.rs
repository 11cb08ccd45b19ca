//! Verification challenge tokens.

use rand::rngs::OsRng;
use rand::RngCore;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the charset size that fits in a byte. Bytes at or
/// above it are rejected so every character is equally likely.
const ACCEPT_BELOW: u8 = (256 / CHARSET.len() * CHARSET.len()) as u8;

/// Generate an alphanumeric token of `length` characters from the OS CSPRNG.
///
/// Tokens are single-use and live for one round trip, so collisions with an
/// in-flight challenge are harmless.
///
/// # Errors
///
/// Fails only if the operating system RNG is unavailable.
pub fn generate_challenge(length: usize) -> Result<String, rand::Error> {
    let mut token = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while token.len() < length {
        OsRng.try_fill_bytes(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if token.len() == length {
                break;
            }
            token.push(char::from(CHARSET[usize::from(b) % CHARSET.len()]));
        }
    }

    Ok(token)
}
