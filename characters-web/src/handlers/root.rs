//! Unauthenticated landing route

/// Plain-text greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = String))
)]
pub async fn root() -> &'static str {
    "hello world"
}
