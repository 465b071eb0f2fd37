//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{auth_token::AuthToken, user::User};
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, token_key::TokenKey, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_USERNAME_KEY: &str = "users_username_canonical_key";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Field error for a unique violation on `users`, keyed by constraint name
fn unique_violation_error(code: Option<&str>, constraint: Option<&str>) -> Option<AuthError> {
    if code != Some(UNIQUE_VIOLATION) {
        return None;
    }
    match constraint {
        Some(USERS_EMAIL_KEY) => Some(AuthError::email_taken()),
        Some(USERS_USERNAME_KEY) => Some(AuthError::username_taken()),
        _ => None,
    }
}

fn map_user_insert_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(mapped) = unique_violation_error(db_err.code().as_deref(), db_err.constraint())
        {
            return mapped;
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                username,
                username_canonical,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.username.original())
        .bind(user.username.canonical())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, username, password_hash, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, username, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, username, password_hash, created_at
            FROM users
            WHERE username_canonical = $1
            "#,
        )
        .bind(username.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username_canonical = $1)",
        )
        .bind(username.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Token Repository Implementation
// ============================================================================

impl TokenRepository for PgAuthRepository {
    async fn get_or_create(&self, user_id: &UserId) -> AuthResult<(AuthToken, bool)> {
        let candidate = AuthToken::issue(*user_id);

        // A concurrent insert for the same user makes this return no row
        let inserted = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO auth_tokens (key, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING key, user_id, created_at
            "#,
        )
        .bind(candidate.key.as_str())
        .bind(candidate.user_id.as_uuid())
        .bind(candidate.created_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            tracing::info!(user_id = %user_id, "Issued auth token");
            return Ok((row.into_token(), true));
        }

        let existing = sqlx::query_as::<_, TokenRow>(
            "SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok((existing.into_token(), false))
    }

    async fn find_by_key(&self, key: &TokenKey) -> AuthResult<Option<AuthToken>> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT key, user_id, created_at FROM auth_tokens WHERE key = $1",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TokenRow::into_token))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            username: UserName::from_db(self.username),
            password_hash,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    key: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TokenRow {
    fn into_token(self) -> AuthToken {
        AuthToken {
            key: TokenKey::from_db(self.key),
            user_id: UserId::from_uuid(self.user_id),
            created_at: self.created_at,
        }
    }
}
