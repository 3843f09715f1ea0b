//! Caller identity middleware for Axum
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! diner as `X-User-Id`. This layer only parses it.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::common::ApiResponse;

/// Header carrying the authenticated user's ID
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug)]
pub enum IdentityError {
    MissingUser,
    InvalidUser,
}

/// The diner on whose behalf the request runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Rejects requests without a valid `X-User-Id`, otherwise stores
/// an [`AuthenticatedUser`] in the request extensions.
pub async fn identity_middleware(mut request: Request<Body>, next: Next) -> Response {
    let Some(raw) = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        return identity_error_response(IdentityError::MissingUser);
    };

    let Ok(user_id) = Uuid::parse_str(raw.trim()) else {
        return identity_error_response(IdentityError::InvalidUser);
    };

    tracing::Span::current().record("user_id", tracing::field::display(user_id));
    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });
    next.run(request).await
}

fn identity_error_response(error: IdentityError) -> Response {
    let message = match error {
        IdentityError::MissingUser => "Missing X-User-Id header",
        IdentityError::InvalidUser => "X-User-Id must be a UUID",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}
