//! Table catalog and availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::application::{AvailabilityResolver, TableCatalog};
use crate::domain::{DomainError, TimeSlot};
use crate::interfaces::http::common::{ApiError, ApiResponse};

use super::dto::*;

/// Application state for catalog handlers.
#[derive(Clone)]
pub struct TablesState {
    pub catalog: Arc<TableCatalog>,
    pub availability: Arc<AvailabilityResolver>,
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    tag = "Tables",
    responses(
        (status = 200, description = "All tables ordered by number", body = ApiResponse<Vec<TableDto>>),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_tables(
    State(state): State<TablesState>,
) -> Result<Json<ApiResponse<Vec<TableDto>>>, ApiError> {
    let tables = state.catalog.list_tables().await?;
    Ok(Json(ApiResponse::success(
        tables.into_iter().map(TableDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/zones",
    tag = "Tables",
    responses(
        (status = 200, description = "Tables grouped by zone in display order", body = ApiResponse<Vec<ZoneGroupDto>>),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_tables_by_zone(
    State(state): State<TablesState>,
) -> Result<Json<ApiResponse<Vec<ZoneGroupDto>>>, ApiError> {
    let groups = state.catalog.tables_by_zone().await?;
    Ok(Json(ApiResponse::success(
        groups.into_iter().map(ZoneGroupDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Tables",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability snapshot", body = ApiResponse<AvailabilityDto>),
        (status = 422, description = "Time is not a bookable slot"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn get_availability(
    State(state): State<TablesState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    let time = match query.time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(TimeSlot::parse(raw).ok_or_else(|| {
            DomainError::ValidationFailed(format!("{:?} is not a bookable time", raw))
        })?),
    };

    let snapshot = state.availability.snapshot(query.date, time).await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}
