use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Key clients must present; `None` disables the check
#[derive(Clone)]
pub struct ClientApiKey(pub Option<String>);

fn unauthorized(message: &str, code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::with_code(message, code)),
    )
        .into_response()
}

/// Reject requests whose `X-API-Key` header doesn't match the configured key
pub async fn require_api_key(
    Extension(ClientApiKey(expected_key)): Extension<ClientApiKey>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Invalid API key");
            unauthorized("Invalid API key", "INVALID_API_KEY")
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Missing API key");
            unauthorized(
                "API key required. Provide X-API-Key header.",
                "MISSING_API_KEY",
            )
        }
    }
}
