//! Availability resolution
//!
//! Which tables an active reservation holds at a given slot. Cancelled and
//! completed reservations never occupy a slot.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DomainResult, RepositoryProvider, Table, TimeSlot, Zone};

/// One table at the requested slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAvailability {
    pub table: Table,
    pub available: bool,
}

/// Per-zone counts at the requested slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneAvailability {
    pub zone: Zone,
    pub total: usize,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    pub date: NaiveDate,
    pub time: TimeSlot,
    /// Every table, ordered by number
    pub tables: Vec<TableAvailability>,
    /// Zones that have tables, in display order
    pub zones: Vec<ZoneAvailability>,
}

impl AvailabilitySnapshot {
    pub fn total(&self) -> usize {
        self.tables.len()
    }

    pub fn available_count(&self) -> usize {
        self.tables.iter().filter(|t| t.available).count()
    }
}

/// Result of asking for availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Date or time missing. Not the same as "everything free".
    Unknown,
    Known(AvailabilitySnapshot),
}

pub struct AvailabilityResolver {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Table IDs held by an active reservation at (date, time).
    ///
    /// Empty when either coordinate is missing; callers must read that as
    /// "unknown", see [`AvailabilityResolver::snapshot`].
    pub async fn occupied_tables(
        &self,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    ) -> DomainResult<HashSet<Uuid>> {
        let (Some(date), Some(time)) = (date, time) else {
            return Ok(HashSet::new());
        };
        let ids = self
            .repos
            .reservations()
            .find_active_table_ids(date, time)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// All tables minus the occupied ones, ordered by number
    pub async fn available_tables(
        &self,
        date: NaiveDate,
        time: TimeSlot,
    ) -> DomainResult<Vec<Table>> {
        let occupied = self.occupied_tables(Some(date), Some(time)).await?;
        let mut tables = self.repos.tables().list_ordered().await?;
        tables.retain(|t| !occupied.contains(&t.id));
        Ok(tables)
    }

    /// Every table flagged available/occupied plus per-zone counts
    pub async fn snapshot(
        &self,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    ) -> DomainResult<Availability> {
        let (Some(date), Some(time)) = (date, time) else {
            return Ok(Availability::Unknown);
        };

        let occupied = self.occupied_tables(Some(date), Some(time)).await?;
        let tables: Vec<TableAvailability> = self
            .repos
            .tables()
            .list_ordered()
            .await?
            .into_iter()
            .map(|table| TableAvailability {
                available: !occupied.contains(&table.id),
                table,
            })
            .collect();

        let zones = Zone::ALL
            .iter()
            .filter_map(|&zone| {
                let in_zone = tables.iter().filter(|t| t.table.location == zone);
                let total = in_zone.clone().count();
                (total > 0).then(|| ZoneAvailability {
                    zone,
                    total,
                    available: in_zone.filter(|t| t.available).count(),
                })
            })
            .collect();

        Ok(Availability::Known(AvailabilitySnapshot {
            date,
            time,
            tables,
            zones,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Reservation, ReservationStatus};
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::parse(s).unwrap()
    }

    fn floor() -> Vec<Table> {
        vec![
            Table::new(1, 2, Zone::WindowView),
            Table::new(2, 2, Zone::WindowView),
            Table::new(12, 4, Zone::GardenSection),
        ]
    }

    async fn book(repos: &InMemoryRepositoryProvider, table: &Table, time: &str) -> Reservation {
        repos
            .reservations()
            .insert_active(Reservation::confirmed(
                Uuid::new_v4(),
                table.id,
                date(),
                slot(time),
                2,
                None,
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_coordinate_yields_empty_set_and_unknown() {
        let tables = floor();
        let repos = Arc::new(InMemoryRepositoryProvider::with_tables(tables.clone()));
        book(&repos, &tables[0], "19:00").await;
        let resolver = AvailabilityResolver::new(repos);

        assert!(resolver
            .occupied_tables(None, Some(slot("19:00")))
            .await
            .unwrap()
            .is_empty());
        assert!(resolver
            .occupied_tables(Some(date()), None)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            resolver.snapshot(Some(date()), None).await.unwrap(),
            Availability::Unknown
        );
    }

    #[tokio::test]
    async fn only_active_reservations_occupy() {
        let tables = floor();
        let repos = Arc::new(InMemoryRepositoryProvider::with_tables(tables.clone()));
        let first = book(&repos, &tables[0], "19:00").await;
        book(&repos, &tables[2], "19:00").await;
        book(&repos, &tables[1], "19:30").await;
        repos
            .reservations()
            .transition_status(first.id, &ReservationStatus::ACTIVE, ReservationStatus::Cancelled)
            .await
            .unwrap();

        let resolver = AvailabilityResolver::new(repos);
        let occupied = resolver
            .occupied_tables(Some(date()), Some(slot("19:00")))
            .await
            .unwrap();
        assert_eq!(occupied, HashSet::from([tables[2].id]));

        // Same answer with no intervening writes
        let again = resolver
            .occupied_tables(Some(date()), Some(slot("19:00")))
            .await
            .unwrap();
        assert_eq!(occupied, again);

        let free: Vec<i32> = resolver
            .available_tables(date(), slot("19:00"))
            .await
            .unwrap()
            .iter()
            .map(|t| t.number)
            .collect();
        assert_eq!(free, vec![1, 2]);
    }

    #[tokio::test]
    async fn snapshot_counts_per_zone() {
        let tables = floor();
        let repos = Arc::new(InMemoryRepositoryProvider::with_tables(tables.clone()));
        book(&repos, &tables[1], "12:00").await;
        let resolver = AvailabilityResolver::new(repos);

        let Availability::Known(snapshot) = resolver
            .snapshot(Some(date()), Some(slot("12:00")))
            .await
            .unwrap()
        else {
            panic!("expected a known snapshot");
        };

        assert_eq!(snapshot.total(), 3);
        assert_eq!(snapshot.available_count(), 2);
        assert_eq!(
            snapshot.zones,
            vec![
                ZoneAvailability {
                    zone: Zone::WindowView,
                    total: 2,
                    available: 1
                },
                ZoneAvailability {
                    zone: Zone::GardenSection,
                    total: 1,
                    available: 1
                },
            ]
        );
        assert!(!snapshot.tables[1].available);
    }
}
