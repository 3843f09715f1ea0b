//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to the per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::reservation::ReservationRepository;
use super::table::TableRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// The store collaborator: services hold an `Arc<dyn RepositoryProvider>`
/// and ask only for the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let tables = repos.tables().list_ordered().await?;
///     let held = repos.reservations().find_active_table_ids(date, slot).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tables(&self) -> &dyn TableRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
