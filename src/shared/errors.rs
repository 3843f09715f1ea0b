use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::reservation::{ReservationStatus, TimeSlot};

/// Every way a booking operation can be rejected.
///
/// Each rejected operation maps to exactly one variant; the core never
/// reports a failed precondition as a bare boolean.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input
    #[error("Validation: {0}")]
    ValidationFailed(String),

    /// Lost the race for a (table, date, time) slot
    #[error("Table {table_id} is already booked for {date} at {time}")]
    SlotTaken {
        table_id: Uuid,
        date: NaiveDate,
        time: TimeSlot,
    },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Reservation {reservation_id} belongs to another user")]
    NotOwner { reservation_id: Uuid },

    #[error("Reservation {reservation_id} is already in the past")]
    AlreadyPast { reservation_id: Uuid },

    #[error("Reservation {reservation_id} is {status} and cannot be changed")]
    NotCancellable {
        reservation_id: Uuid,
        status: ReservationStatus,
    },

    /// The backing store could not be reached or failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn reservation_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the operation may succeed if the caller retries it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Message safe to show to the diner.
    ///
    /// Store failures never leak internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationFailed(msg) => msg.clone(),
            Self::SlotTaken { .. } => {
                "This table was just booked for that time. Please choose another table or time."
                    .to_string()
            }
            Self::NotFound { entity, .. } => format!("{} not found.", entity),
            Self::NotOwner { .. } => "This reservation belongs to another guest.".to_string(),
            Self::AlreadyPast { .. } => {
                "This reservation is in the past and can no longer be cancelled.".to_string()
            }
            Self::NotCancellable { status, .. } => {
                format!("This reservation is already {} and cannot be changed.", status)
            }
            Self::StoreUnavailable(_) => {
                "We could not reach the reservation system. Please try again.".to_string()
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_failures_are_transient() {
        assert!(DomainError::StoreUnavailable("pool timed out".into()).is_transient());
        assert!(!DomainError::ValidationFailed("bad".into()).is_transient());
        assert!(!DomainError::SlotTaken {
            table_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: TimeSlot::parse("19:00").unwrap(),
        }
        .is_transient());
    }

    #[test]
    fn store_failure_message_hides_detail() {
        let err = DomainError::StoreUnavailable("connection refused at 10.0.0.5".into());
        assert!(!err.user_message().contains("10.0.0.5"));
        assert!(err.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn slot_taken_message_is_actionable() {
        let err = DomainError::SlotTaken {
            table_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: TimeSlot::parse("19:00").unwrap(),
        };
        assert!(err.user_message().contains("choose another"));
        assert!(err.to_string().contains("2024-06-01 at 19:00"));
    }
}
