//! Reservation entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,
    pub table_id: String,

    pub reservation_date: Date,
    /// Slot start, `HH:MM`
    pub reservation_time: String,

    pub guest_count: i32,

    #[sea_orm(nullable)]
    pub special_requests: Option<String>,

    /// Reservation status: pending, confirmed, cancelled, completed
    pub status: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dining_table::Entity",
        from = "Column::TableId",
        to = "super::dining_table::Column::Id"
    )]
    DiningTable,
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
