//! `/session`

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::auth::{Session, SessionUser};
use crate::core::error::TentError;
use crate::core::extractors::bearer_token;
use crate::core::{JsonBody, OwnerSession};
use crate::server::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Session>, TentError> {
    request.validate()?;
    let session = state
        .identity
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(session))
}

pub async fn logout(owner: OwnerSession, State(state): State<AppState>) -> Result<StatusCode, TentError> {
    state.identity.logout(&owner.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public: who, if anyone, the presented token belongs to
pub async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionState> {
    let user = match bearer_token(&headers) {
        Some(token) => state
            .identity
            .authenticate(token)
            .await
            .ok()
            .and_then(|context| context.user().cloned()),
        None => None,
    };

    Json(SessionState {
        authenticated: user.is_some(),
        user,
    })
}
