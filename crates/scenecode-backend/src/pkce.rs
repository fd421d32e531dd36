//! PKCE helpers (RFC 7636) and random OAuth values.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// 32 random bytes, base64url without padding (43 characters).
pub fn generate_code_verifier() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<32>())
}

/// S256 challenge for a verifier.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// 16 random bytes, base64url without padding.
pub fn generate_state() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<16>())
}

/// 32 random bytes as 64 lowercase hex characters, used to poll for tokens.
pub fn generate_read_key() -> String {
    hex::encode(random_bytes::<32>())
}
