//! Reservation aggregate
//!
//! Contains the Reservation entity, the slot enumeration, related types,
//! and the repository interface.

pub mod model;
pub mod repository;
pub mod slot;

pub use model::{
    NewReservation, Reservation, ReservationDetails, ReservationStatus, SlotKey,
    MAX_GUESTS, MAX_SPECIAL_REQUESTS_LEN, MIN_GUESTS,
};
pub use repository::{ReservationRepository, SortOrder};
pub use slot::{ServiceWindow, TimeSlot};
