//! Table aggregate
//!
//! Contains the physical Table entity, the seating Zone enumeration,
//! and the catalog repository interface.

pub mod model;
pub mod repository;

pub use model::{Table, Zone};
pub use repository::TableRepository;
