//! Non-database store implementations

mod memory;

pub use memory::{InMemoryRepositoryProvider, InMemoryReservationRepository, InMemoryTableRepository};
