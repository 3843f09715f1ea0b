//! Table catalog repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Table;
use crate::domain::DomainResult;

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// All tables, ascending by table number
    async fn list_ordered(&self) -> DomainResult<Vec<Table>>;

    /// Find a table by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Table>>;

    /// Number of tables in the catalog
    async fn count(&self) -> DomainResult<u64>;

    /// Add a table (administrative seeding only)
    async fn save(&self, table: Table) -> DomainResult<()>;
}
