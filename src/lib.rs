//! # Tablebook
//!
//! Restaurant table booking core: a fixed catalog of tables, fixed daily
//! time slots and reservations that can never double-book a slot.
//!
//! ## Architecture
//!
//! - **domain**: entities, slot enumeration and repository traits
//! - **application**: catalog, availability, classifier and reservation lifecycle
//! - **infrastructure**: SeaORM store and in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: clock, errors and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiState};
