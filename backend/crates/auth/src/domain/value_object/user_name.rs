//! User Name Value Object
//!
//! The user name is the account's public handle, used for login and display.
//!
//! ## Rules
//! - NFKC normalized and trimmed before validation
//! - 1 to 150 characters
//! - Letters, digits and `@ . + - _` only, so an email address is a valid
//!   user name (registration falls back to the email when none is given)
//! - Uniqueness is decided on the canonical (lower-cased) form; the original
//!   spelling is kept for display

use kernel::error::app_error::{AppError, AppResult};
use kernel::validation::MSG_BLANK;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 150;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['@', '.', '+', '-', '_'];

pub const MSG_INVALID_USER_NAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

/// User name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Create a new user name with validation
    ///
    /// Error messages are user-facing field errors.
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let original = normalized.trim().to_string();

        if original.is_empty() {
            return Err(AppError::bad_request(MSG_BLANK));
        }

        if original.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Ensure this field has no more than {} characters.",
                USER_NAME_MAX_LENGTH
            )));
        }

        if !original
            .chars()
            .all(|c| c.is_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&c))
        {
            return Err(AppError::bad_request(MSG_INVALID_USER_NAME));
        }

        let canonical = original.to_lowercase();
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Rebuild from the stored original spelling
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    /// Spelling as entered
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lower-cased form used for uniqueness and lookup
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("alice.smith+dev_1-x").is_ok());
        assert!(UserName::new("a@x.com").is_ok());
        assert!(UserName::new("名前").is_ok());
    }

    #[test]
    fn test_canonical_form() {
        let name = UserName::new("  Alice ").unwrap();
        assert_eq!(name.original(), "Alice");
        assert_eq!(name.canonical(), "alice");
        assert_eq!(name, UserName::from_db("Alice"));
    }

    #[test]
    fn test_nfkc_normalization() {
        let name = UserName::new("ａｌｉｃｅ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_invalid_characters() {
        let err = UserName::new("alice smith").unwrap_err();
        assert_eq!(err.message(), MSG_INVALID_USER_NAME);
        assert!(UserName::new("alice!").is_err());
        assert!(UserName::new("al/ice").is_err());
    }

    #[test]
    fn test_length_limits() {
        assert_eq!(UserName::new("").unwrap_err().message(), MSG_BLANK);
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }
}
