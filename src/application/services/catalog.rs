//! Table catalog service

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DomainResult, RepositoryProvider, Table, Zone};

/// Tables of one zone, ordered by number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGroup {
    pub zone: Zone,
    pub tables: Vec<Table>,
}

/// Read access to the physical tables
pub struct TableCatalog {
    repos: Arc<dyn RepositoryProvider>,
}

impl TableCatalog {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// All tables ordered ascending by number
    pub async fn list_tables(&self) -> DomainResult<Vec<Table>> {
        self.repos.tables().list_ordered().await
    }

    pub async fn find_table(&self, id: Uuid) -> DomainResult<Option<Table>> {
        self.repos.tables().find_by_id(id).await
    }

    /// Tables grouped in zone display order; zones without tables are omitted
    pub async fn tables_by_zone(&self) -> DomainResult<Vec<ZoneGroup>> {
        Ok(group_by_zone(&self.list_tables().await?))
    }

    /// Administrative seeding: store `floor_plan` only when the catalog is empty.
    ///
    /// Returns how many tables were stored.
    pub async fn seed_if_empty(&self, floor_plan: Vec<Table>) -> DomainResult<usize> {
        let tables = self.repos.tables();
        if tables.count().await? > 0 {
            return Ok(0);
        }

        let seeded = floor_plan.len();
        for table in floor_plan {
            tables.save(table).await?;
        }
        Ok(seeded)
    }
}

/// Group tables by zone in `Zone::ALL` order, keeping each group ordered by number.
pub fn group_by_zone(tables: &[Table]) -> Vec<ZoneGroup> {
    Zone::ALL
        .iter()
        .filter_map(|&zone| {
            let mut in_zone: Vec<Table> = tables
                .iter()
                .filter(|t| t.location == zone)
                .cloned()
                .collect();
            if in_zone.is_empty() {
                return None;
            }
            in_zone.sort_by_key(|t| t.number);
            Some(ZoneGroup {
                zone,
                tables: in_zone,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;

    #[test]
    fn groups_follow_zone_order_and_skip_empty_zones() {
        let tables = vec![
            Table::new(14, 8, Zone::PrivateDining),
            Table::new(3, 2, Zone::WindowView),
            Table::new(1, 2, Zone::WindowView),
            Table::new(12, 4, Zone::GardenSection),
        ];

        let groups = group_by_zone(&tables);
        let zones: Vec<Zone> = groups.iter().map(|g| g.zone).collect();
        assert_eq!(
            zones,
            vec![Zone::WindowView, Zone::GardenSection, Zone::PrivateDining]
        );
        assert_eq!(
            groups[0].tables.iter().map(|t| t.number).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn seeding_only_happens_once() {
        let catalog = TableCatalog::new(Arc::new(InMemoryRepositoryProvider::new()));
        let plan = || vec![Table::new(2, 4, Zone::MainHall), Table::new(1, 2, Zone::MainHall)];

        assert_eq!(catalog.seed_if_empty(plan()).await.unwrap(), 2);
        assert_eq!(catalog.seed_if_empty(plan()).await.unwrap(), 0);

        let numbers: Vec<i32> = catalog
            .list_tables()
            .await
            .unwrap()
            .iter()
            .map(|t| t.number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_transient_error() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.set_offline(true);
        let catalog = TableCatalog::new(repos);
        assert!(catalog.list_tables().await.unwrap_err().is_transient());
    }
}
