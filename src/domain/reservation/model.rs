//! Reservation domain entity

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use super::slot::TimeSlot;
use crate::domain::table::Table;

/// Smallest accepted party
pub const MIN_GUESTS: i32 = 1;
/// Largest accepted party
pub const MAX_GUESTS: i32 = 8;
/// Upper bound on the free-text special requests
pub const MAX_SPECIAL_REQUESTS_LEN: usize = 500;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Awaiting approval; never produced at creation today but kept valid
    Pending,
    /// Booked and holding its slot
    Confirmed,
    /// Cancelled by its owner
    Cancelled,
    /// Marked completed by an administrative process
    Completed,
}

impl ReservationStatus {
    /// Statuses that hold a slot
    pub const ACTIVE: [ReservationStatus; 2] = [Self::Pending, Self::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether this status occupies its (table, date, time) slot
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The unit of table occupancy: at most one active reservation per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub table_id: Uuid,
    pub date: NaiveDate,
    pub time: TimeSlot,
}

/// Table reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Reserved table
    pub table_id: Uuid,
    /// Calendar date of the visit
    pub date: NaiveDate,
    /// Time slot of the visit
    pub time: TimeSlot,
    /// Party size
    pub guest_count: i32,
    pub special_requests: Option<String>,
    /// Current status
    pub status: ReservationStatus,
    /// When the reservation was created (audit only)
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// A new reservation in the `confirmed` state
    pub fn confirmed(
        user_id: Uuid,
        table_id: Uuid,
        date: NaiveDate,
        time: TimeSlot,
        guest_count: i32,
        special_requests: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            table_id,
            date,
            time,
            guest_count,
            special_requests,
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    /// Date and time the slot starts, in restaurant local time
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.start_time())
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            table_id: self.table_id,
            date: self.date,
            time: self.time,
        }
    }

    /// Check if this reservation holds its slot
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Unvalidated booking request as received from a caller
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub date: NaiveDate,
    /// Raw `HH:MM`; must be one of the slot enumeration
    pub time: String,
    pub guest_count: i32,
    pub special_requests: Option<String>,
}

/// A reservation joined with the table it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub table: Table,
}

impl AsRef<Reservation> for Reservation {
    fn as_ref(&self) -> &Reservation {
        self
    }
}

impl AsRef<Reservation> for ReservationDetails {
    fn as_ref(&self) -> &Reservation {
        &self.reservation
    }
}

// ── Tests ──────────────────────────────────────────────────────
