//! In-Memory Repository Implementation
//!
//! Used when no database is configured and by the test suite.
//! Check-and-insert runs under one write lock, so uniqueness holds for
//! concurrent requests just as the database constraints do.

use std::collections::HashMap;
use std::sync::Arc;

use platform::crypto::constant_time_eq;
use tokio::sync::RwLock;

use crate::domain::entity::{auth_token::AuthToken, user::User};
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, token_key::TokenKey, user_id::UserId, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    /// Keyed by owner: one token per user
    tokens: HashMap<UserId, AuthToken>,
}

/// In-memory auth repository
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::email_taken());
        }
        if state
            .users
            .values()
            .any(|u| u.username.canonical() == user.username.canonical())
        {
            return Err(AuthError::username_taken());
        }
        if state.users.contains_key(&user.user_id) {
            return Err(AuthError::Internal(format!(
                "Duplicate user_id: {}",
                user.user_id
            )));
        }

        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username.canonical() == username.canonical())
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}

impl TokenRepository for MemoryAuthRepository {
    async fn get_or_create(&self, user_id: &UserId) -> AuthResult<(AuthToken, bool)> {
        let mut state = self.state.write().await;

        if let Some(token) = state.tokens.get(user_id) {
            return Ok((token.clone(), false));
        }

        let token = AuthToken::issue(*user_id);
        state.tokens.insert(*user_id, token.clone());
        tracing::info!(user_id = %user_id, "Issued auth token");

        Ok((token, true))
    }

    async fn find_by_key(&self, key: &TokenKey) -> AuthResult<Option<AuthToken>> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .values()
            .find(|t| constant_time_eq(t.key.as_str().as_bytes(), key.as_str().as_bytes()))
            .cloned())
    }
}
