//! Reservation lifecycle
//!
//! Creates reservations and moves them through their statuses. Status
//! changes go through `ReservationRepository::transition_status`, so two
//! concurrent requests cannot both move the same reservation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::classifier::{self, Partitioned, ReservationSummary};
use crate::domain::{
    DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation,
    ReservationDetails, ReservationStatus, SortOrder, Table, TimeSlot,
};
use crate::domain::reservation::{MAX_GUESTS, MAX_SPECIAL_REQUESTS_LEN, MIN_GUESTS};

/// Upcoming reservations shown on the dashboard by default
pub const DASHBOARD_LIMIT: usize = 3;

/// A reservation as shown to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationView {
    pub details: ReservationDetails,
    pub can_cancel: bool,
}

impl AsRef<Reservation> for ReservationView {
    fn as_ref(&self) -> &Reservation {
        &self.details.reservation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub summary: ReservationSummary,
    /// Next active reservations, soonest first
    pub next: Vec<ReservationView>,
}

pub struct ReservationLifecycle {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationLifecycle {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Validate and book a table.
    ///
    /// The slot check happens in the store as part of the insert; losing
    /// the race yields `SlotTaken`.
    pub async fn create(
        &self,
        request: NewReservation,
        now: NaiveDateTime,
    ) -> DomainResult<Reservation> {
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&request.guest_count) {
            return Err(DomainError::ValidationFailed(format!(
                "guest count must be between {} and {}",
                MIN_GUESTS, MAX_GUESTS
            )));
        }

        let time = TimeSlot::parse(request.time.trim()).ok_or_else(|| {
            DomainError::ValidationFailed(format!("{:?} is not a bookable time", request.time))
        })?;

        let special_requests = normalize_special_requests(request.special_requests)?;

        if request.date.and_time(time.start_time()) <= now {
            return Err(DomainError::ValidationFailed(
                "cannot book a time that has already passed".to_string(),
            ));
        }

        if self.repos.tables().find_by_id(request.table_id).await?.is_none() {
            return Err(DomainError::ValidationFailed("unknown table".to_string()));
        }

        let reservation = Reservation::confirmed(
            request.user_id,
            request.table_id,
            request.date,
            time,
            request.guest_count,
            special_requests,
        );
        self.repos.reservations().insert_active(reservation).await
    }

    /// Cancel a reservation on behalf of its owner.
    pub async fn cancel(
        &self,
        reservation_id: Uuid,
        requesting_user: Uuid,
        now: NaiveDateTime,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;

        if !reservation.is_owned_by(requesting_user) {
            return Err(DomainError::NotOwner { reservation_id });
        }
        if reservation.status.is_terminal() {
            return Err(DomainError::NotCancellable {
                reservation_id,
                status: reservation.status,
            });
        }
        if reservation.starts_at() < now {
            return Err(DomainError::AlreadyPast { reservation_id });
        }

        self.transition(reservation_id, ReservationStatus::Cancelled)
            .await?;
        reservation.status = ReservationStatus::Cancelled;
        Ok(reservation)
    }

    /// Administrative transition to `completed` once the slot has started.
    pub async fn complete(
        &self,
        reservation_id: Uuid,
        now: NaiveDateTime,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;

        if reservation.status.is_terminal() {
            return Err(DomainError::NotCancellable {
                reservation_id,
                status: reservation.status,
            });
        }
        if reservation.starts_at() > now {
            return Err(DomainError::ValidationFailed(
                "reservation has not started yet".to_string(),
            ));
        }

        self.transition(reservation_id, ReservationStatus::Completed)
            .await?;
        reservation.status = ReservationStatus::Completed;
        Ok(reservation)
    }

    /// One reservation with its table, visible to its owner only
    pub async fn get(
        &self,
        reservation_id: Uuid,
        requesting_user: Uuid,
    ) -> DomainResult<ReservationDetails> {
        let reservation = self.load(reservation_id).await?;
        if !reservation.is_owned_by(requesting_user) {
            return Err(DomainError::NotOwner { reservation_id });
        }

        let table = self
            .repos
            .tables()
            .find_by_id(reservation.table_id)
            .await?
            .ok_or_else(|| missing_table(reservation.table_id))?;
        Ok(ReservationDetails { reservation, table })
    }

    /// The user's reservations, latest first, split into upcoming and past
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> DomainResult<Partitioned<ReservationView>> {
        let reservations = self
            .repos
            .reservations()
            .find_for_user(user_id, SortOrder::Descending)
            .await?;
        let views = self.join_tables(reservations, now).await?;
        Ok(classifier::partition(views, now))
    }

    /// Summary plus the next `limit` active reservations that have not started
    pub async fn dashboard(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
        limit: usize,
    ) -> DomainResult<Dashboard> {
        let reservations = self.repos.reservations();
        let all = reservations
            .find_for_user(user_id, SortOrder::Ascending)
            .await?;
        let summary = classifier::summarize(&all, now);

        let mut next = reservations
            .find_active_for_user_from(user_id, now.date())
            .await?;
        next.retain(|r| r.starts_at() > now);
        next.truncate(limit);

        Ok(Dashboard {
            summary,
            next: self.join_tables(next, now).await?,
        })
    }

    async fn load(&self, reservation_id: Uuid) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(reservation_id))
    }

    /// Move an active reservation to `to`; if another request got there
    /// first, report the status it left behind.
    async fn transition(&self, reservation_id: Uuid, to: ReservationStatus) -> DomainResult<()> {
        let changed = self
            .repos
            .reservations()
            .transition_status(reservation_id, &ReservationStatus::ACTIVE, to)
            .await?;
        if changed {
            return Ok(());
        }

        let current = self.load(reservation_id).await?;
        Err(DomainError::NotCancellable {
            reservation_id,
            status: current.status,
        })
    }

    async fn join_tables(
        &self,
        reservations: Vec<Reservation>,
        now: NaiveDateTime,
    ) -> DomainResult<Vec<ReservationView>> {
        let tables: HashMap<Uuid, Table> = self
            .repos
            .tables()
            .list_ordered()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        reservations
            .into_iter()
            .map(|reservation| {
                let table = tables
                    .get(&reservation.table_id)
                    .cloned()
                    .ok_or_else(|| missing_table(reservation.table_id))?;
                Ok(ReservationView {
                    can_cancel: classifier::can_cancel(&reservation, now),
                    details: ReservationDetails { reservation, table },
                })
            })
            .collect()
    }
}

fn normalize_special_requests(raw: Option<String>) -> DomainResult<Option<String>> {
    let Some(text) = raw else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_SPECIAL_REQUESTS_LEN {
        return Err(DomainError::ValidationFailed(format!(
            "special requests must be at most {} characters",
            MAX_SPECIAL_REQUESTS_LEN
        )));
    }
    Ok(Some(trimmed.to_string()))
}

fn missing_table(table_id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity: "Table",
        field: "id",
        value: table_id.to_string(),
    }
}
