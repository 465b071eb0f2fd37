//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for hashing and policy checks.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordPolicy;
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string());
//! assert!(raw.check_policy(&PasswordPolicy::default(), &[]).is_ok());
//!
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicy, PasswordPolicyError,
    verify_against_dummy,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// NFKC normalized; memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> Self {
        Self(ClearTextPassword::new(raw))
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_blank()
    }

    /// Whether both inputs are the same password (constant time)
    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }

    /// Check against a password policy
    ///
    /// `attributes` are `(field, value)` pairs of the account being created.
    pub fn check_policy(
        &self,
        policy: &PasswordPolicy,
        attributes: &[(&str, &str)],
    ) -> Result<(), Vec<PasswordPolicyError>> {
        policy.validate(&self.0, attributes)
    }

    /// Check if password has been compromised (via HIBP API)
    ///
    /// ## Returns
    /// - `Ok(true)` if compromised
    /// - `Ok(false)` if not found in breaches
    /// - `Err(_)` if check failed (treat as non-blocking)
    pub async fn is_compromised(&self) -> AppResult<bool> {
        self.0
            .check_breach()
            .await
            .map_err(|e| AppError::service_unavailable(e.to_string()).with_source(e))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
///
/// Stores password in Argon2id PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| {
            let message = match &e {
                PasswordHashError::HashingFailed(msg) => format!("Password hashing failed: {}", msg),
                _ => "Unexpected error during password hashing".to_string(),
            };
            AppError::internal(message).with_source(e)
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))?;

        Ok(Self(hashed))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash (constant time)
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// Burn one verification when there is no stored hash to check against
    pub fn verify_missing(raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        verify_against_dummy(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
