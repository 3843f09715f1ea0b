//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::ApiResponse;
use crate::domain::DomainError;

/// Handler error: a `DomainError` rendered as the `ApiResponse` envelope
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::SlotTaken { .. } => StatusCode::CONFLICT,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::NotOwner { .. } => StatusCode::FORBIDDEN,
            DomainError::AlreadyPast { .. } => StatusCode::CONFLICT,
            DomainError::NotCancellable { .. } => StatusCode::CONFLICT,
            DomainError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_transient() {
            tracing::error!(error = %self.0, "Store failure");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let body = ApiResponse::<()>::error(self.0.user_message());
        (status, Json(body)).into_response()
    }
}
