//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::{Dashboard, ReservationSummary, ReservationView};
use crate::domain::{NewReservation, Reservation};
use crate::interfaces::http::modules::tables::TableDto;

/// Request to book a table
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    pub table_id: Uuid,
    /// Calendar date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Slot start (HH:MM), one of the bookable slots
    #[schema(example = "19:00")]
    #[validate(length(min = 1, message = "time is required"))]
    pub time: String,
    #[validate(range(min = 1, max = 8, message = "must be between 1 and 8"))]
    #[schema(minimum = 1, maximum = 8, example = 2)]
    pub guest_count: i32,
    /// Free text, trimmed; at most 500 characters
    pub special_requests: Option<String>,
}

impl CreateReservationRequest {
    pub fn into_new_reservation(self, user_id: Uuid) -> NewReservation {
        NewReservation {
            user_id,
            table_id: self.table_id,
            date: self.date,
            time: self.time,
            guest_count: self.guest_count,
            special_requests: self.special_requests,
        }
    }
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    /// "Lunch" or "Dinner"
    pub service: String,
    pub guest_count: i32,
    pub special_requests: Option<String>,
    /// pending | confirmed | cancelled | completed
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            table_id: r.table_id,
            date: r.date,
            time: r.time.as_str().to_string(),
            service: r.time.service().as_str().to_string(),
            guest_count: r.guest_count,
            special_requests: r.special_requests,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}

/// A reservation with its table, as listed to its owner
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationCardDto {
    pub reservation: ReservationDto,
    pub table: TableDto,
    pub can_cancel: bool,
}

impl From<ReservationView> for ReservationCardDto {
    fn from(v: ReservationView) -> Self {
        Self {
            reservation: v.details.reservation.into(),
            table: v.details.table.into(),
            can_cancel: v.can_cancel,
        }
    }
}

/// The caller's reservations, latest first within each list
#[derive(Debug, Serialize, ToSchema)]
pub struct MyReservationsDto {
    pub upcoming: Vec<ReservationCardDto>,
    pub past: Vec<ReservationCardDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryDto {
    pub total: usize,
    pub upcoming_count: usize,
    pub completed_count: usize,
}

impl From<ReservationSummary> for SummaryDto {
    fn from(s: ReservationSummary) -> Self {
        Self {
            total: s.total,
            upcoming_count: s.upcoming_count,
            completed_count: s.completed_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    pub summary: SummaryDto,
    /// Next active reservations, soonest first
    pub next: Vec<ReservationCardDto>,
}

impl From<Dashboard> for DashboardDto {
    fn from(d: Dashboard) -> Self {
        Self {
            summary: d.summary.into(),
            next: d.next.into_iter().map(ReservationCardDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// How many upcoming reservations to include (1-20, default 3)
    pub limit: Option<usize>,
}
