//! Application services

mod availability;
mod catalog;
pub mod classifier;
mod lifecycle;

pub use availability::{
    Availability, AvailabilityResolver, AvailabilitySnapshot, TableAvailability, ZoneAvailability,
};
pub use catalog::{group_by_zone, TableCatalog, ZoneGroup};
pub use classifier::{Partitioned, ReservationSummary, Temporal};
pub use lifecycle::{Dashboard, ReservationLifecycle, ReservationView, DASHBOARD_LIMIT};
