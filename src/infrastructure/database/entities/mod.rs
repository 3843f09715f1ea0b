//! Database entities module

pub mod dining_table;
pub mod reservation;

pub use dining_table::Entity as DiningTable;
pub use reservation::Entity as Reservation;
