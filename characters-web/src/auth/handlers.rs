//! Login endpoint

use super::{credentials_match, jwt::AuthError};
use crate::handlers::types::{LoginRequest, LoginResponse, MessageResponse};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::Json,
    Form,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Credentials as sent, from a JSON or a form-encoded body.
///
/// A field that is absent, or not a string, is `None` and can never match.
/// Bodies that do not parse at all yield no credentials rather than a
/// rejection, so every failed login answers with the same 401.
#[derive(Debug, Default)]
pub struct LoginCredentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl LoginCredentials {
    fn from_json(body: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            user: field("user"),
            password: field("password"),
        }
    }

    fn from_form(mut fields: HashMap<String, String>) -> Self {
        Self {
            user: fields.remove("user"),
            password: fields.remove("password"),
        }
    }
}

impl<S> FromRequest<S> for LoginCredentials
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            return match Form::<HashMap<String, String>>::from_request(request, state).await {
                Ok(Form(fields)) => Ok(Self::from_form(fields)),
                Err(e) => {
                    debug!("Unreadable login form: {}", e);
                    Ok(Self::default())
                }
            };
        }

        let body = Bytes::from_request(request, state).await.map_err(|e| {
            debug!("Unreadable login body: {}", e);
            AuthError::InvalidCredentials
        })?;
        Ok(Self::from_json(&body))
    }
}

/// Exchange the configured credential pair for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Log In",
    summary = "Log in",
    description = "After logging in you will be given a token, you can use that token to use all routes.",
    request_body(
        content(
            (LoginRequest = "application/json"),
            (LoginRequest = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 200, description = "Logged in, token issued", body = LoginResponse),
        (status = 401, description = "User or password is incorrect", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    credentials: LoginCredentials,
) -> Result<Json<LoginResponse>, AuthError> {
    let user = credentials.user.as_deref().unwrap_or_default();

    let accepted = match (&credentials.user, &credentials.password) {
        (Some(user), Some(password)) => credentials_match(&state.config.auth, user, password),
        _ => false,
    };
    if !accepted {
        warn!("Rejected login attempt for user '{}'", user);
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.tokens.issue()?;
    info!("User '{}' logged in", user);

    Ok(Json(LoginResponse {
        message: "You are logged in".to_string(),
        token,
    }))
}
