//! Route definitions

use crate::{auth, handlers, middleware::require_token, openapi::ApiDoc, AppState};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/login", post(auth::handlers::login))
}

/// Character routes, gated by the bearer token check
pub fn character_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/characters",
            get(handlers::list_characters).post(handlers::create_character),
        )
        .route(
            "/characters/{id}",
            get(handlers::get_character)
                .put(handlers::replace_character)
                .delete(handlers::delete_character),
        )
        .route_layer(from_fn_with_state(state, require_token))
}

/// Swagger UI at `/api-docs`
pub fn docs_routes() -> Router<AppState> {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
