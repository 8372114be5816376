use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;

use super::handlers::ApiError;
use crate::domain::user::models::Identity;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Middleware that validates the access token and adds the caller's identity
/// to request extensions.
///
/// Performs no database access.
pub async fn authenticate<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.uri(), req.headers()).ok_or_else(|| {
        tracing::debug!("No access token presented");
        ApiError::unauthorized()
    })?;

    let claims = state.authenticator.validate_token(&token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::unauthorized()
    })?;

    let user_id = UserId::from_string(&claims.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Access token carries a malformed user id");
        ApiError::unauthorized()
    })?;

    req.extensions_mut().insert(Identity {
        user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Read the access token from the `token` query parameter, falling back to an
/// `Authorization: Bearer <token>` header.
///
/// An empty query value is ignored. A header that is not exactly
/// `Bearer` followed by one space and the token counts as no token.
pub fn extract_token(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    let from_query = Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty());

    if from_query.is_some() {
        return from_query;
    }

    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let parts: Vec<&str> = header.split(' ').collect();

    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}
