//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::validation::{FieldErrors, NON_FIELD_ERRORS};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

pub const MSG_MISSING_IDENTIFIER: &str = "Must provide either email or username.";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const MSG_EMAIL_TAKEN: &str = "A user with that email already exists.";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_UNAUTHENTICATED: &str = "Authentication credentials were not provided or are invalid.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Field-level validation failures (including uniqueness conflicts)
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// Login without email or user name
    #[error("Must provide either email or username.")]
    MissingIdentifier,

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Request body is not the expected JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Missing or unknown token on a protected route
    #[error("Authentication credentials were not provided or are invalid.")]
    Unauthenticated,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Email uniqueness violation, reported as a field error
    pub fn email_taken() -> Self {
        AuthError::Validation(FieldErrors::single("email", MSG_EMAIL_TAKEN))
    }

    /// User name uniqueness violation, reported as a field error
    pub fn username_taken() -> Self {
        AuthError::Validation(FieldErrors::single("username", MSG_USERNAME_TAKEN))
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(detail = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthenticated => {
                tracing::debug!("Rejected request without valid token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => AppError::validation(errors),
            AuthError::MissingIdentifier => AppError::validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                MSG_MISSING_IDENTIFIER,
            )),
            AuthError::InvalidCredentials => AppError::validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                MSG_INVALID_CREDENTIALS,
            )),
            AuthError::MalformedBody(detail) => AppError::bad_request(detail)
                .with_action("Send a JSON object with the documented fields"),
            AuthError::Unauthenticated => AppError::unauthorized(MSG_UNAUTHENTICATED)
                .with_action("Send an 'Authorization: Token <key>' header"),
            AuthError::Database(e) => AppError::from(e),
            // Internal details stay in the logs
            AuthError::Internal(_) => AppError::internal("Internal server error"),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let unauthenticated = matches!(self, AuthError::Unauthenticated);
        let mut response = AppError::from(self).into_response();
        if unauthenticated {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Token"),
            );
        }
        response
    }
}
