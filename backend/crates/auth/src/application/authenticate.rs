//! Authenticate Use Case
//!
//! Resolves a presented token key to its user.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::token_key::TokenKey;
use crate::error::{AuthError, AuthResult};

/// Token authentication use case
pub struct AuthenticateUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
}

impl<U, T> AuthenticateUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>) -> Self {
        Self {
            user_repo,
            token_repo,
        }
    }

    /// Returns the token's owner, or `Unauthenticated`
    pub async fn execute(&self, raw_key: &str) -> AuthResult<User> {
        let key = TokenKey::parse(raw_key).ok_or(AuthError::Unauthenticated)?;

        let token = self
            .token_repo
            .find_by_key(&key)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        let user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        tracing::debug!(user_id = %user.user_id, "Token authenticated");

        Ok(user)
    }
}
