//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, then runs
//! `validator::Validate::validate()` on the deserialized value.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateReservationRequest>) {
///     // `body` passed its field rules
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    /// Body is not JSON, or does not have the expected shape
    JsonError(JsonRejection),
    /// Field rules failed
    ValidationError(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            // Wrong field types / missing fields are input errors like any other validation failure
            Self::JsonError(JsonRejection::JsonDataError(err)) => {
                let body = ApiResponse::<()>::error(err.body_text());
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (rejection.status(), Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let mut field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            let msg = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            format!("{}: {}", field, msg)
                        })
                    })
                    .collect();
                field_errors.sort();

                let message = if field_errors.is_empty() {
                    "Validation failed".to_string()
                } else {
                    field_errors.join("; ")
                };

                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Party {
        #[validate(range(min = 1, max = 8, message = "must be between 1 and 8"))]
        guest_count: i32,
        #[validate(length(max = 10))]
        note: Option<String>,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<Party>) -> &'static str {
        "ok"
    }

    async fn post_body(body: &'static str) -> StatusCode {
        let app = Router::new().route("/party", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/party")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn valid_body_is_accepted() {
        assert_eq!(post_body(r#"{"guest_count": 4}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn syntax_error_is_bad_request() {
        assert_eq!(post_body("{guest_count").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        assert_eq!(
            post_body(r#"{"note": "hi"}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        assert_eq!(
            post_body(r#"{"guest_count": 0}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            post_body(r#"{"guest_count": 2, "note": "far too long a note"}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
