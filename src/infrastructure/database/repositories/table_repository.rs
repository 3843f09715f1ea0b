//! SeaORM implementation of TableRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::{db_err, parse_id};
use crate::domain::table::{Table, TableRepository, Zone};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::dining_table;

pub struct SeaOrmTableRepository {
    db: DatabaseConnection,
}

impl SeaOrmTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: dining_table::Model) -> DomainResult<Table> {
    let location = Zone::parse(&m.location).ok_or_else(|| {
        DomainError::StoreUnavailable(format!("Corrupt location in store: {:?}", m.location))
    })?;
    Ok(Table {
        id: parse_id("table id", &m.id)?,
        number: m.table_number,
        capacity: m.capacity,
        location,
    })
}

// ── TableRepository impl ────────────────────────────────────────

#[async_trait]
impl TableRepository for SeaOrmTableRepository {
    async fn list_ordered(&self) -> DomainResult<Vec<Table>> {
        dining_table::Entity::find()
            .order_by_asc(dining_table::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Table>> {
        dining_table::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn count(&self) -> DomainResult<u64> {
        dining_table::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn save(&self, table: Table) -> DomainResult<()> {
        debug!("Saving table {} ({})", table.number, table.location);

        let model = dining_table::ActiveModel {
            id: Set(table.id.to_string()),
            table_number: Set(table.number),
            capacity: Set(table.capacity),
            location: Set(table.location.label().to_string()),
            created_at: Set(Utc::now()),
        };
        dining_table::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::ValidationFailed(
                    format!("table number {} already exists", table.number),
                ),
                _ => db_err(e),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn tables_round_trip_in_number_order() {
        let repo = SeaOrmTableRepository::new(test_connection().await);
        let garden = Table::new(12, 4, Zone::GardenSection);
        repo.save(Table::new(14, 8, Zone::PrivateDining)).await.unwrap();
        repo.save(garden.clone()).await.unwrap();

        let listed = repo.list_ordered().await.unwrap();
        assert_eq!(listed.iter().map(|t| t.number).collect::<Vec<_>>(), vec![12, 14]);
        assert_eq!(repo.find_by_id(garden.id).await.unwrap(), Some(garden));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_table_number_is_rejected() {
        let repo = SeaOrmTableRepository::new(test_connection().await);
        repo.save(Table::new(1, 2, Zone::WindowView)).await.unwrap();
        let err = repo
            .save(Table::new(1, 4, Zone::MainHall))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }
}
