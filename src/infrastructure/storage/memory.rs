//! In-memory store for development and testing
//!
//! Gives the same guarantees as the database store: the active-slot index
//! is a `DashMap` keyed by (table, date, time), and claiming its entry is
//! the atomic check-and-insert.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationRepository,
    ReservationStatus, SlotKey, SortOrder, Table, TableRepository, TimeSlot,
};

/// Shared on/off switch used to simulate an unreachable store
#[derive(Clone, Default)]
struct Outage(Arc<AtomicBool>);

impl Outage {
    fn check(&self) -> DomainResult<()> {
        if self.0.load(Ordering::SeqCst) {
            Err(DomainError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

// ── Tables ─────────────────────────────────────────────────────

pub struct InMemoryTableRepository {
    tables: DashMap<Uuid, Table>,
    outage: Outage,
}

#[async_trait]
impl TableRepository for InMemoryTableRepository {
    async fn list_ordered(&self) -> DomainResult<Vec<Table>> {
        self.outage.check()?;
        let mut tables: Vec<Table> = self.tables.iter().map(|e| e.value().clone()).collect();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Table>> {
        self.outage.check()?;
        Ok(self.tables.get(&id).map(|t| t.clone()))
    }

    async fn count(&self) -> DomainResult<u64> {
        self.outage.check()?;
        Ok(self.tables.len() as u64)
    }

    async fn save(&self, table: Table) -> DomainResult<()> {
        self.outage.check()?;
        if self.tables.iter().any(|t| t.number == table.number) {
            return Err(DomainError::ValidationFailed(format!(
                "table number {} already exists",
                table.number
            )));
        }
        self.tables.insert(table.id, table);
        Ok(())
    }
}

// ── Reservations ───────────────────────────────────────────────

pub struct InMemoryReservationRepository {
    rows: DashMap<Uuid, Reservation>,
    /// Active slot → holding reservation
    active_slots: DashMap<SlotKey, Uuid>,
    outage: Outage,
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert_active(&self, reservation: Reservation) -> DomainResult<Reservation> {
        self.outage.check()?;
        if !reservation.is_active() {
            return Err(DomainError::ValidationFailed(format!(
                "cannot insert a {} reservation",
                reservation.status
            )));
        }

        let key = reservation.slot_key();
        // The shard lock is released before touching `rows`; never hold both.
        match self.active_slots.entry(key) {
            Entry::Occupied(_) => {
                return Err(DomainError::SlotTaken {
                    table_id: key.table_id,
                    date: key.date,
                    time: key.time,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(reservation.id);
            }
        }

        self.rows.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        self.outage.check()?;
        Ok(self.rows.get(&id).map(|r| r.clone()))
    }

    async fn find_active_table_ids(
        &self,
        date: NaiveDate,
        time: TimeSlot,
    ) -> DomainResult<Vec<Uuid>> {
        self.outage.check()?;
        Ok(self
            .active_slots
            .iter()
            .filter(|e| e.key().date == date && e.key().time == time)
            .map(|e| e.key().table_id)
            .collect())
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        order: SortOrder,
    ) -> DomainResult<Vec<Reservation>> {
        self.outage.check()?;
        let mut found: Vec<Reservation> = self
            .rows
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        found.sort_by_key(|r| (r.date, r.time, r.created_at));
        if order == SortOrder::Descending {
            found.reverse();
        }
        Ok(found)
    }

    async fn find_active_for_user_from(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let mut found = self.find_for_user(user_id, SortOrder::Ascending).await?;
        found.retain(|r| r.is_active() && r.date >= from);
        Ok(found)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> DomainResult<bool> {
        self.outage.check()?;
        let key = {
            let Some(mut row) = self.rows.get_mut(&id) else {
                return Ok(false);
            };
            if !from.contains(&row.status) {
                return Ok(false);
            }
            row.status = to;
            row.slot_key()
        };

        if !to.is_active() {
            self.active_slots.remove_if(&key, |_, holder| *holder == id);
        }
        Ok(true)
    }
}

// ── Provider ───────────────────────────────────────────────────

/// In-memory `RepositoryProvider`
pub struct InMemoryRepositoryProvider {
    tables: InMemoryTableRepository,
    reservations: InMemoryReservationRepository,
    outage: Outage,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let outage = Outage::default();
        Self {
            tables: InMemoryTableRepository {
                tables: DashMap::new(),
                outage: outage.clone(),
            },
            reservations: InMemoryReservationRepository {
                rows: DashMap::new(),
                active_slots: DashMap::new(),
                outage: outage.clone(),
            },
            outage,
        }
    }

    /// Start with the given tables in the catalog
    pub fn with_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        let provider = Self::new();
        for table in tables {
            provider.tables.tables.insert(table.id, table);
        }
        provider
    }

    /// Make every subsequent call fail with `StoreUnavailable` (or recover).
    pub fn set_offline(&self, offline: bool) {
        self.outage.0.store(offline, Ordering::SeqCst);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}

// ── Tests ──────────────────────────────────────────────────────
