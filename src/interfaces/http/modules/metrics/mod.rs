//! Prometheus metrics endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::http_metrics_middleware;

/// Successful bookings
pub const RESERVATIONS_CREATED: &str = "reservations_created_total";
/// Bookings that lost the race for a slot
pub const RESERVATION_CONFLICTS: &str = "reservation_conflicts_total";
pub const RESERVATIONS_CANCELLED: &str = "reservations_cancelled_total";
