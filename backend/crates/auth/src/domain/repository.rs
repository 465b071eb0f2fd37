//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//!
//! Uniqueness (email, user name, one token per user) is the store's
//! responsibility: `create` must fail with [`AuthError::Validation`] when a
//! unique field is already taken, even if a concurrent request won the race
//! after the use case's pre-check.
//!
//! [`AuthError::Validation`]: crate::error::AuthError::Validation

use crate::domain::entity::{auth_token::AuthToken, user::User};
use crate::domain::value_object::{
    email::Email, token_key::TokenKey, user_id::UserId, user_name::UserName,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by canonical user name
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Check if user name exists (canonical form)
    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool>;
}

/// Token repository trait
#[trait_variant::make(TokenRepository: Send)]
pub trait LocalTokenRepository {
    /// Return the user's token, creating it if absent
    ///
    /// The boolean is `true` when a new token was created.
    async fn get_or_create(&self, user_id: &UserId) -> AuthResult<(AuthToken, bool)>;

    /// Find a token by its key
    async fn find_by_key(&self, key: &TokenKey) -> AuthResult<Option<AuthToken>>;
}
