//! Auth Middleware
//!
//! Middleware for requiring a bearer token on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Accepted `Authorization` schemes
const TOKEN_SCHEMES: &[&str] = &["Token", "Bearer"];

/// The user resolved from the request's token
///
/// Inserted into request extensions by [`require_token`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Extract the key from `Authorization: Token <key>` (or `Bearer <key>`)
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;

    TOKEN_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
        .then(|| key.trim())
        .filter(|key| !key.is_empty())
}

/// Middleware that requires a valid token
pub async fn require_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + TokenRepository + Clone + Send + Sync + 'static,
{
    let key = extract_token(req.headers())
        .ok_or(AuthError::Unauthenticated)?
        .to_string();

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.repo.clone());
    let user = use_case.execute(&key).await?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token_schemes() {
        assert_eq!(extract_token(&headers("Token abc123")), Some("abc123"));
        assert_eq!(extract_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(extract_token(&headers("Basic abc123")), None);
        assert_eq!(extract_token(&headers("Token")), None);
        assert_eq!(extract_token(&headers("Token   ")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
