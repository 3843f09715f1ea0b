//! Reservation HTTP handlers
//!
//! `now` is read once per request from the state's clock and handed to the
//! lifecycle explicitly.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::application::services::{classifier, DASHBOARD_LIMIT};
use crate::application::ReservationLifecycle;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::metrics::{
    RESERVATIONS_CANCELLED, RESERVATIONS_CREATED, RESERVATION_CONFLICTS,
};
use crate::shared::clock::Clock;

use super::dto::*;

/// Largest dashboard `limit` accepted
const MAX_DASHBOARD_LIMIT: usize = 20;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub lifecycle: Arc<ReservationLifecycle>,
    pub clock: Arc<dyn Clock>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("user_id" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 401, description = "Missing or invalid X-User-Id"),
        (status = 409, description = "Table already booked for that slot"),
        (status = 422, description = "Invalid request"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let now = state.clock.now();
    let table_id = request.table_id;

    match state
        .lifecycle
        .create(request.into_new_reservation(user.user_id), now)
        .await
    {
        Ok(reservation) => {
            metrics::counter!(RESERVATIONS_CREATED).increment(1);
            tracing::info!(
                reservation_id = %reservation.id,
                table_id = %reservation.table_id,
                date = %reservation.date,
                time = %reservation.time,
                "Reservation confirmed"
            );
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(reservation.into())),
            ))
        }
        Err(err @ DomainError::SlotTaken { .. }) => {
            metrics::counter!(RESERVATION_CONFLICTS).increment(1);
            tracing::info!(table_id = %table_id, "Slot already taken");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("user_id" = [])),
    responses(
        (status = 200, description = "Caller's reservations split into upcoming and past", body = ApiResponse<MyReservationsDto>),
        (status = 401, description = "Missing or invalid X-User-Id"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_my_reservations(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<MyReservationsDto>>, ApiError> {
    let listed = state
        .lifecycle
        .list_for_user(user.user_id, state.clock.now())
        .await?;

    Ok(Json(ApiResponse::success(MyReservationsDto {
        upcoming: listed.upcoming.into_iter().map(Into::into).collect(),
        past: listed.past.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/summary",
    tag = "Reservations",
    security(("user_id" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Statistics and next reservations", body = ApiResponse<DashboardDto>),
        (status = 401, description = "Missing or invalid X-User-Id"),
        (status = 422, description = "Invalid limit"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn get_dashboard(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let limit = query.limit.unwrap_or(DASHBOARD_LIMIT);
    if !(1..=MAX_DASHBOARD_LIMIT).contains(&limit) {
        return Err(DomainError::ValidationFailed(format!(
            "limit must be between 1 and {}",
            MAX_DASHBOARD_LIMIT
        ))
        .into());
    }

    let dashboard = state
        .lifecycle
        .dashboard(user.user_id, state.clock.now(), limit)
        .await?;
    Ok(Json(ApiResponse::success(dashboard.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("user_id" = [])),
    params(("reservation_id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with its table", body = ApiResponse<ReservationCardDto>),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationCardDto>>, ApiError> {
    let details = state.lifecycle.get(reservation_id, user.user_id).await?;
    let can_cancel = classifier::can_cancel(&details.reservation, state.clock.now());

    Ok(Json(ApiResponse::success(ReservationCardDto {
        reservation: details.reservation.into(),
        table: details.table.into(),
        can_cancel,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{reservation_id}/cancel",
    tag = "Reservations",
    security(("user_id" = [])),
    params(("reservation_id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already cancelled, completed or in the past"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let cancelled = state
        .lifecycle
        .cancel(reservation_id, user.user_id, state.clock.now())
        .await?;

    metrics::counter!(RESERVATIONS_CANCELLED).increment(1);
    tracing::info!(reservation_id = %reservation_id, "Reservation cancelled");

    Ok(Json(ApiResponse::success(cancelled.into())))
}
