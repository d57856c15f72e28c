//! Bearer token gate for protected routes

use crate::{auth::AuthError, AppState};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Alternative header carrying the token
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of `Authorization`, falling back to `x-access-token`.
///
/// `Ok(None)` means no token was supplied at all. The `Bearer ` prefix is
/// optional.
pub fn extract_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let value = [AUTHORIZATION.as_str(), ACCESS_TOKEN_HEADER]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .find(|value| !value.is_empty());

    let Some(value) = value else {
        return Ok(None);
    };

    let raw = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    Ok(Some(raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw)))
}

/// Verify the bearer token before the handler runs.
///
/// On success the decoded [`crate::auth::Claims`] are placed in the request
/// extensions; otherwise the request is answered with 401 and the handler
/// never starts.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(request.headers())?.ok_or_else(|| {
        debug!("Missing token on {}", request.uri().path());
        AuthError::MissingToken
    })?;

    let claims = state.tokens.verify(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
