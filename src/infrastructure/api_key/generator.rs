//! API Key generation
//!
//! Generates cryptographically random key values of a fixed length.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

use crate::domain::api_key::DEFAULT_KEY_LENGTH;

/// Generator for random API key values
///
/// Keys are drawn from the URL-safe base64 alphabet, so every character
/// carries six bits of entropy from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Number of characters in a generated key
    length: usize,
}

impl ApiKeyGenerator {
    /// Create a generator producing keys of `length` characters
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a new key value
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; byte_count(self.length)];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let mut key = URL_SAFE_NO_PAD.encode(&random_bytes);
        key.truncate(self.length);
        key
    }
}

/// Fewest random bytes whose unpadded base64 encoding has at least `length` characters
fn byte_count(length: usize) -> usize {
    // n bytes encode to ceil(4n / 3) characters
    length.saturating_sub(1) * 3 / 4 + 1
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}
