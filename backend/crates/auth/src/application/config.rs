//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::password::PasswordPolicy;

/// Auth application configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Policy applied to passwords at registration
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Create config for development (default policy, no pepper, no breach check)
    pub fn development() -> Self {
        Self::default()
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_pepper() {
        let config = AuthConfig::default();
        assert!(config.pepper().is_none());
        assert!(!config.password_policy.breach_check_enabled());
    }

    #[test]
    fn test_with_pepper() {
        let config = AuthConfig::development().with_pepper("s3cret");
        assert_eq!(config.pepper(), Some(&b"s3cret"[..]));
    }
}
