//! Auth Token Entity
//!
//! One opaque bearer token per user. No expiry, no rotation.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{token_key::TokenKey, user_id::UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: TokenKey,
    /// Owning user
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Issue a fresh token for a user
    pub fn issue(user_id: UserId) -> Self {
        Self {
            key: TokenKey::generate(),
            user_id,
            created_at: Utc::now(),
        }
    }
}
