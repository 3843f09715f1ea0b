//! Create reservations table
//!
//! The partial unique index over (table, date, time) restricted to active
//! statuses is what makes double-booking impossible, even across processes.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20240101_000001_create_dining_tables::DiningTables;

/// Must match `ReservationStatus::ACTIVE`.
const CREATE_ACTIVE_SLOT_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_reservations_active_slot \
     ON reservations (table_id, reservation_date, reservation_time) \
     WHERE status IN ('pending', 'confirmed')";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).string().not_null())
                    .col(ColumnDef::new(Reservations::TableId).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::ReservationDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::ReservationTime)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::GuestCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::SpecialRequests).text())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("confirmed"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_dining_table")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(DiningTables::Table, DiningTables::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_slot")
                    .table(Reservations::Table)
                    .col(Reservations::ReservationDate)
                    .col(Reservations::ReservationTime)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(CREATE_ACTIVE_SLOT_INDEX)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    TableId,
    ReservationDate,
    ReservationTime,
    GuestCount,
    SpecialRequests,
    Status,
    CreatedAt,
}
