//! Domain layer - entities, slot enumeration and repository interfaces

pub mod repositories;
pub mod reservation;
pub mod table;

// Re-export commonly used types
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    NewReservation, Reservation, ReservationDetails, ReservationRepository, ReservationStatus,
    ServiceWindow, SlotKey, SortOrder, TimeSlot,
};
pub use table::{Table, TableRepository, Zone};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
