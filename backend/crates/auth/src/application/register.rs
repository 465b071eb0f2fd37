//! Register Use Case
//!
//! Validates a registration request and creates the user.
//!
//! Every field is checked before anything is persisted and all field errors
//! are reported together.

use std::sync::Arc;

use kernel::validation::{FieldErrors, MSG_BLANK, MSG_REQUIRED};
use platform::password::PasswordPolicyError;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult, MSG_EMAIL_TAKEN, MSG_USERNAME_TAKEN};

pub const MSG_PASSWORD_MISMATCH: &str = "Password fields didn't match.";

/// Register input
///
/// Fields are optional so that a missing field becomes a field error.
#[derive(Debug, Default)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let mut errors = FieldErrors::new();

        let email = match present(input.email) {
            Ok(raw) => Email::new(raw)
                .map_err(|e| errors.add("email", e.message()))
                .ok(),
            Err(message) => {
                errors.add("email", message);
                None
            }
        };

        // A blank or absent user name falls back to the email
        let username = match input.username.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(raw) => UserName::new(raw)
                .map_err(|e| errors.add("username", e.message()))
                .ok(),
            None => email.as_ref().and_then(|email| {
                UserName::new(email.as_str())
                    .map_err(|e| errors.add("username", e.message()))
                    .ok()
            }),
        };

        let password = match present(input.password) {
            Ok(raw) => Some(RawPassword::new(raw)),
            Err(message) => {
                errors.add("password", message);
                None
            }
        };

        let password2 = match present(input.password2) {
            Ok(raw) => Some(RawPassword::new(raw)),
            Err(message) => {
                errors.add("password2", message);
                None
            }
        };

        if let (Some(password), Some(password2)) = (&password, &password2) {
            if !password.matches(password2) {
                errors.add("password", MSG_PASSWORD_MISMATCH);
            }
        }

        if let Some(password) = &password {
            let mut attributes = Vec::with_capacity(2);
            if let Some(email) = &email {
                attributes.push(("email", email.as_str()));
            }
            if let Some(username) = &username {
                attributes.push(("username", username.original()));
            }

            if let Err(violations) = password.check_policy(&self.config.password_policy, &attributes)
            {
                for violation in violations {
                    errors.add("password", violation.to_string());
                }
            }

            if self.config.password_policy.breach_check_enabled() {
                match password.is_compromised().await {
                    Ok(true) => errors.add("password", PasswordPolicyError::Compromised.to_string()),
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Password breach check unavailable, skipping");
                    }
                }
            }
        }

        if let Some(email) = &email {
            if self.user_repo.exists_by_email(email).await? {
                errors.add("email", MSG_EMAIL_TAKEN);
            }
        }

        if let Some(username) = &username {
            if self.user_repo.exists_by_username(username).await? {
                errors.add("username", MSG_USERNAME_TAKEN);
            }
        }

        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
            tracing::debug!(?fields, "Registration rejected");
            return Err(AuthError::Validation(errors));
        }

        let (Some(email), Some(username), Some(password)) = (email, username, password) else {
            return Err(AuthError::Internal(
                "Registration passed validation with missing fields".to_string(),
            ));
        };

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(email, username, password_hash);

        // The store re-checks uniqueness for concurrent registrations
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }
}

/// Presence check shared by the required string fields
pub(crate) fn present(value: Option<String>) -> Result<String, &'static str> {
    match value {
        None => Err(MSG_REQUIRED),
        Some(v) if v.trim().is_empty() => Err(MSG_BLANK),
        Some(v) => Ok(v),
    }
}
