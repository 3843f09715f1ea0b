//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod repository_provider;
pub mod reservation_repository;
pub mod table_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use uuid::Uuid;

use crate::domain::DomainError;

/// Anything the store itself failed at
fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StoreUnavailable(format!("Database error: {}", e))
}

/// Stored IDs are hyphenated UUID text; anything else is a corrupt row.
fn parse_id(column: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| {
        DomainError::StoreUnavailable(format!("Corrupt {} in store: {:?}", column, raw))
    })
}
