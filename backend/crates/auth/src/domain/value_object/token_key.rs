//! Token Key Value Object
//!
//! Opaque bearer credential: 20 CSPRNG bytes as 40 lowercase hex characters.

use derive_more::Display;
use platform::crypto::random_token_hex;

/// Random bytes per key
const TOKEN_KEY_BYTES: usize = 20;

/// Length of the hex-encoded key
pub const TOKEN_KEY_LENGTH: usize = TOKEN_KEY_BYTES * 2;

#[derive(Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct TokenKey(String);

impl TokenKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self(random_token_hex(TOKEN_KEY_BYTES))
    }

    /// Parse a key presented by a client
    ///
    /// Returns `None` unless the value has the exact key shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let well_formed = raw.len() == TOKEN_KEY_LENGTH
            && raw.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        well_formed.then(|| Self(raw.to_string()))
    }

    /// Rebuild from database value (assumed already validated)
    pub fn from_db(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are credentials; show only a prefix
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "TokenKey({prefix}…)")
    }
}
