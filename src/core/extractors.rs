//! Axum extractors for owner sessions and JSON bodies
//!
//! Both reject with [`TentError`] so every failure leaves the API in the
//! same `{code, message, details}` shape.

use axum::Json;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, request::Parts};
use serde::de::DeserializeOwned;

use crate::core::auth::{AuthContext, SessionUser};
use crate::core::error::{AuthError, TentError, ValidationError};
use crate::server::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated owner behind the current request
///
/// Handlers taking this extractor are owner-only; anonymous callers get 401.
#[derive(Debug, Clone)]
pub struct OwnerSession {
    pub user: SessionUser,
    pub token: String,
}

impl<S> FromRequestParts<S> for OwnerSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TentError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;

        match state.identity.authenticate(token).await? {
            AuthContext::Owner { user, token } => Ok(OwnerSession { user, token }),
            AuthContext::Anonymous => Err(AuthError::InvalidToken.into()),
        }
    }
}

/// `Json<T>` whose rejection is reported as an `INVALID_JSON` validation error
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = TentError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}
