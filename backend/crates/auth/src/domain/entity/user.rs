//! User Entity
//!
//! Account record created by registration. Never mutated by this service.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, also exposed as `id` in responses
    pub user_id: UserId,
    /// Email (unique, normalized)
    pub email: Email,
    /// User name (unique on canonical form)
    pub username: UserName,
    /// Argon2id hash
    pub password_hash: UserPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: Email, username: UserName, password_hash: UserPassword) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
