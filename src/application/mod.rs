pub mod services;

// Re-export key types for convenience
pub use services::{
    Availability, AvailabilityResolver, AvailabilitySnapshot, Dashboard, ReservationLifecycle,
    ReservationSummary, ReservationView, TableCatalog, Temporal, ZoneGroup,
};
