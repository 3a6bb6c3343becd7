//! Request extractors.
//!
//! [`AuthUser`] doubles as an axum extractor: any handler that takes it as an
//! argument requires a bearer token and receives the verified identity. A
//! missing token is a 401, a token the identity provider rejects is a 403.
//!
//! [`ApiJson`] and [`ApiQuery`] wrap the stock extractors so malformed
//! payloads come back in the standard `{error}` body rather than axum's
//! plain-text rejections.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::identity::AuthUser;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is not validated; whatever follows the first space is the
/// token, and an empty token counts as missing.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(ApiError::Unauthorized("Access token required".to_string()));
        };

        state.identity.verify_token(token).await
    }
}

/// JSON body extractor whose rejection is an [`ApiError`].
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query-string extractor whose rejection is an [`ApiError`].
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))?;
        Ok(Self(value))
    }
}
