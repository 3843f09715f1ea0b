//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Set, SqlErr,
};
use uuid::Uuid;

use super::{db_err, parse_id};
use crate::domain::reservation::{
    Reservation, ReservationRepository, ReservationStatus, SortOrder, TimeSlot,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let time = TimeSlot::parse(&m.reservation_time).ok_or_else(|| {
        DomainError::StoreUnavailable(format!(
            "Corrupt reservation_time in store: {:?}",
            m.reservation_time
        ))
    })?;
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::StoreUnavailable(format!("Corrupt status in store: {:?}", m.status))
    })?;

    Ok(Reservation {
        id: parse_id("reservation id", &m.id)?,
        user_id: parse_id("user id", &m.user_id)?,
        table_id: parse_id("table id", &m.table_id)?,
        date: m.reservation_date,
        time,
        guest_count: m.guest_count,
        special_requests: m.special_requests,
        status,
        created_at: m.created_at,
    })
}

fn active_statuses() -> impl Iterator<Item = &'static str> {
    ReservationStatus::ACTIVE.iter().map(|s| s.as_str())
}

fn ordered(query: Select<reservation::Entity>, order: SortOrder) -> Select<reservation::Entity> {
    match order {
        SortOrder::Ascending => query
            .order_by_asc(reservation::Column::ReservationDate)
            .order_by_asc(reservation::Column::ReservationTime)
            .order_by_asc(reservation::Column::CreatedAt),
        SortOrder::Descending => query
            .order_by_desc(reservation::Column::ReservationDate)
            .order_by_desc(reservation::Column::ReservationTime)
            .order_by_desc(reservation::Column::CreatedAt),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_active(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(
            "Inserting reservation {} for table {} on {} at {}",
            r.id, r.table_id, r.date, r.time
        );
        if !r.is_active() {
            return Err(DomainError::ValidationFailed(format!(
                "cannot insert a {} reservation",
                r.status
            )));
        }

        let model = reservation::ActiveModel {
            id: Set(r.id.to_string()),
            user_id: Set(r.user_id.to_string()),
            table_id: Set(r.table_id.to_string()),
            reservation_date: Set(r.date),
            reservation_time: Set(r.time.as_str().to_string()),
            guest_count: Set(r.guest_count),
            special_requests: Set(r.special_requests.clone()),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
        };

        // The partial unique index decides the race for the slot.
        reservation::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::SlotTaken {
                    table_id: r.table_id,
                    date: r.date,
                    time: r.time,
                },
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    DomainError::ValidationFailed("unknown table".to_string())
                }
                _ => db_err(e),
            })?;

        Ok(r)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_active_table_ids(
        &self,
        date: NaiveDate,
        time: TimeSlot,
    ) -> DomainResult<Vec<Uuid>> {
        let ids: Vec<String> = reservation::Entity::find()
            .select_only()
            .column(reservation::Column::TableId)
            .filter(reservation::Column::ReservationDate.eq(date))
            .filter(reservation::Column::ReservationTime.eq(time.as_str()))
            .filter(reservation::Column::Status.is_in(active_statuses()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        ids.iter().map(|raw| parse_id("table id", raw)).collect()
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        order: SortOrder,
    ) -> DomainResult<Vec<Reservation>> {
        let query = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id.to_string()));
        ordered(query, order)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn find_active_for_user_from(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let query = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id.to_string()))
            .filter(reservation::Column::ReservationDate.gte(from))
            .filter(reservation::Column::Status.is_in(active_statuses()));
        ordered(query, SortOrder::Ascending)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> DomainResult<bool> {
        debug!("Transitioning reservation {} to {}", id, to);

        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(to.as_str()))
            .filter(reservation::Column::Id.eq(id.to_string()))
            .filter(reservation::Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::table::{Table, TableRepository, Zone};
    use crate::infrastructure::database::repositories::table_repository::SeaOrmTableRepository;
    use crate::infrastructure::database::test_connection;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::parse(s).unwrap()
    }

    async fn setup() -> (SeaOrmReservationRepository, Table) {
        let db = test_connection().await;
        let table = Table::new(12, 4, Zone::GardenSection);
        SeaOrmTableRepository::new(db.clone())
            .save(table.clone())
            .await
            .unwrap();
        (SeaOrmReservationRepository::new(db), table)
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let (repo, table) = setup().await;
        let user = Uuid::new_v4();
        let r = Reservation::confirmed(
            user,
            table.id,
            date(1),
            slot("19:00"),
            4,
            Some("Window seat".into()),
        );

        repo.insert_active(r.clone()).await.unwrap();
        let stored = repo.find_by_id(r.id).await.unwrap().unwrap();
        assert_eq!(stored.time, slot("19:00"));
        assert_eq!(stored.special_requests.as_deref(), Some("Window seat"));
        assert_eq!(stored.status, ReservationStatus::Confirmed);
        assert_eq!(
            repo.find_active_table_ids(date(1), slot("19:00")).await.unwrap(),
            vec![table.id]
        );
    }

    #[tokio::test]
    async fn duplicate_active_slot_is_slot_taken() {
        let (repo, table) = setup().await;
        repo.insert_active(Reservation::confirmed(
            Uuid::new_v4(),
            table.id,
            date(1),
            slot("19:00"),
            2,
            None,
        ))
        .await
        .unwrap();

        let err = repo
            .insert_active(Reservation::confirmed(
                Uuid::new_v4(),
                table.id,
                date(1),
                slot("19:00"),
                2,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));
    }

    #[tokio::test]
    async fn cancelled_row_does_not_block_rebooking() {
        let (repo, table) = setup().await;
        let first = Reservation::confirmed(Uuid::new_v4(), table.id, date(1), slot("19:00"), 2, None);
        repo.insert_active(first.clone()).await.unwrap();

        assert!(repo
            .transition_status(first.id, &ReservationStatus::ACTIVE, ReservationStatus::Cancelled)
            .await
            .unwrap());
        assert!(repo
            .find_active_table_ids(date(1), slot("19:00"))
            .await
            .unwrap()
            .is_empty());

        repo.insert_active(Reservation::confirmed(
            Uuid::new_v4(),
            table.id,
            date(1),
            slot("19:00"),
            2,
            None,
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn conditional_transition_only_applies_once() {
        let (repo, table) = setup().await;
        let r = Reservation::confirmed(Uuid::new_v4(), table.id, date(1), slot("12:00"), 2, None);
        repo.insert_active(r.clone()).await.unwrap();

        assert!(repo
            .transition_status(r.id, &ReservationStatus::ACTIVE, ReservationStatus::Cancelled)
            .await
            .unwrap());
        assert!(!repo
            .transition_status(r.id, &ReservationStatus::ACTIVE, ReservationStatus::Cancelled)
            .await
            .unwrap());
        assert!(!repo
            .transition_status(Uuid::new_v4(), &ReservationStatus::ACTIVE, ReservationStatus::Cancelled)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_table_is_rejected() {
        let (repo, _) = setup().await;
        let err = repo
            .insert_active(Reservation::confirmed(
                Uuid::new_v4(),
                Uuid::new_v4(),
                date(1),
                slot("19:00"),
                2,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn user_history_is_sorted_by_date_then_time() {
        let (repo, table) = setup().await;
        let user = Uuid::new_v4();
        for (d, t) in [(2, "12:00"), (1, "19:00"), (2, "11:00"), (3, "18:00")] {
            repo.insert_active(Reservation::confirmed(user, table.id, date(d), slot(t), 2, None))
                .await
                .unwrap();
        }
        repo.insert_active(Reservation::confirmed(
            Uuid::new_v4(),
            table.id,
            date(1),
            slot("11:00"),
            2,
            None,
        ))
        .await
        .unwrap();

        let desc: Vec<(NaiveDate, &str)> = repo
            .find_for_user(user, SortOrder::Descending)
            .await
            .unwrap()
            .iter()
            .map(|r| (r.date, r.time.as_str()))
            .collect();
        assert_eq!(
            desc,
            vec![
                (date(3), "18:00"),
                (date(2), "12:00"),
                (date(2), "11:00"),
                (date(1), "19:00"),
            ]
        );

        let upcoming = repo.find_active_for_user_from(user, date(2)).await.unwrap();
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].time, slot("11:00"));
    }

    #[tokio::test]
    async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
        let (repo, table) = setup().await;
        let repo = Arc::new(repo);
        let table_id = table.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert_active(Reservation::confirmed(
                        Uuid::new_v4(),
                        table_id,
                        date(1),
                        slot("19:00"),
                        2,
                        None,
                    ))
                    .await
                })
            })
            .collect();

        let mut won = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(DomainError::SlotTaken { .. }) => taken += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(won, 1);
        assert_eq!(taken, 7);
    }
}
