//! Login Use Case
//!
//! Authenticates a user by email or user name plus password.
//!
//! Unknown accounts and wrong passwords produce the same error, and both
//! cost one Argon2 verification.

use std::sync::Arc;

use kernel::validation::FieldErrors;

use crate::application::config::AuthConfig;
use crate::application::register::present;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Login input
#[derive(Debug, Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<User> {
        let password = present(input.password)
            .map(RawPassword::new)
            .map_err(|message| AuthError::Validation(FieldErrors::single("password", message)))?;

        // Blank identifiers count as absent
        let email = input.email.filter(|e| !e.trim().is_empty());
        let username = input.username.filter(|u| !u.trim().is_empty());

        if email.is_none() && username.is_none() {
            return Err(AuthError::MissingIdentifier);
        }

        let user = self.find_user(email.as_deref(), username.as_deref()).await?;

        // Policy is not applied here: accounts created under an older policy
        // must still be able to log in.
        let verified = match &user {
            Some(user) => user.password_hash.verify(&password, self.config.pepper()),
            None => UserPassword::verify_missing(&password, self.config.pepper()),
        };

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = %user.user_id, "User logged in");
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Look up by email first, then by user name
    ///
    /// Identifiers that cannot be a valid email or user name match nobody.
    async fn find_user(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> AuthResult<Option<User>> {
        if let Some(email) = email.and_then(|e| Email::new(e).ok()) {
            if let Some(user) = self.user_repo.find_by_email(&email).await? {
                return Ok(Some(user));
            }
        }

        match username.and_then(|u| UserName::new(u).ok()) {
            Some(username) => self.user_repo.find_by_username(&username).await,
            None => Ok(None),
        }
    }
}
