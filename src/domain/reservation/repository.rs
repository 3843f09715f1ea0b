//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::model::{Reservation, ReservationStatus};
use super::slot::TimeSlot;
use crate::domain::DomainResult;

/// Ordering by reservation date, then time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert an active reservation as a single atomic check-and-insert.
    ///
    /// Fails with `DomainError::SlotTaken` when another active reservation
    /// already holds the same (table, date, time). The store decides the
    /// race; callers must not pre-check and assume the answer still holds.
    async fn insert_active(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reservation>>;

    /// Table IDs held by an active reservation at the given slot
    async fn find_active_table_ids(
        &self,
        date: NaiveDate,
        time: TimeSlot,
    ) -> DomainResult<Vec<Uuid>>;

    /// All reservations of a user, any status
    async fn find_for_user(&self, user_id: Uuid, order: SortOrder)
        -> DomainResult<Vec<Reservation>>;

    /// Active reservations of a user dated `from` or later, ascending
    async fn find_active_for_user_from(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> DomainResult<Vec<Reservation>>;

    /// Conditionally move a reservation to `to` if its current status is in `from`.
    ///
    /// Returns `false` when no row matched (unknown ID or status not in `from`).
    async fn transition_status(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> DomainResult<bool>;
}
