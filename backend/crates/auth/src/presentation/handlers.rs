//! HTTP Handlers

use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::{TokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, MSG_LOGGED_IN, MSG_REGISTERED, MeResponse, RegisterRequest,
    UserSummary,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + TokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Unwrap a JSON body, turning decode failures into a 400
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    body.map(|Json(req)| req)
        .map_err(|rejection| AuthError::MalformedBody(rejection.body_text()))
}

/// Issue (or reuse) the user's token and build the response body
async fn token_response<R>(repo: &R, user: &User, message: &str) -> AuthResult<AuthResponse>
where
    R: TokenRepository,
{
    let (token, _created) = repo.get_or_create(&user.user_id).await?;

    Ok(AuthResponse {
        message: message.to_string(),
        user: UserSummary::from(user),
        token: token.key.to_string(),
    })
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register/
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + TokenRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        username: req.username,
        password: req.password,
        password2: req.password2,
    };

    let user = use_case.execute(input).await?;
    let response = token_response(state.repo.as_ref(), &user, MSG_REGISTERED).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login/
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + TokenRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let input = LoginInput {
        email: req.email,
        username: req.username,
        password: req.password,
    };

    let user = use_case.execute(input).await?;
    let response = token_response(state.repo.as_ref(), &user, MSG_LOGGED_IN).await?;

    Ok(Json(response))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/me/
///
/// Behind `require_token`, which inserts the authenticated user.
pub async fn me(Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserSummary::from(&user),
    })
}
