//! Table and availability DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::{Availability, ZoneGroup};
use crate::domain::Table;

/// A physical table
#[derive(Debug, Serialize, ToSchema)]
pub struct TableDto {
    pub id: Uuid,
    pub number: i32,
    /// Seats
    pub capacity: i32,
    /// Zone label, e.g. "Garden Section"
    #[schema(example = "Garden Section")]
    pub location: String,
}

impl From<Table> for TableDto {
    fn from(t: Table) -> Self {
        Self {
            id: t.id,
            number: t.number,
            capacity: t.capacity,
            location: t.location.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneGroupDto {
    pub zone: String,
    pub tables: Vec<TableDto>,
}

impl From<ZoneGroup> for ZoneGroupDto {
    fn from(g: ZoneGroup) -> Self {
        Self {
            zone: g.zone.label().to_string(),
            tables: g.tables.into_iter().map(TableDto::from).collect(),
        }
    }
}

/// Slot to check; both parts are needed for a known answer
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Calendar date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    /// Slot start (HH:MM)
    #[param(example = "19:00")]
    pub time: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableAvailabilityDto {
    pub table: TableDto,
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneAvailabilityDto {
    pub zone: String,
    pub total: usize,
    pub available: usize,
}

/// Availability at a slot.
///
/// `known = false` (and nothing else) when the date or time is missing;
/// that means "not evaluated", not "all free".
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub known: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// "Lunch" or "Dinner"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableAvailabilityDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<ZoneAvailabilityDto>>,
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        match a {
            Availability::Unknown => Self {
                known: false,
                date: None,
                time: None,
                service: None,
                total: None,
                available: None,
                tables: None,
                zones: None,
            },
            Availability::Known(s) => Self {
                known: true,
                date: Some(s.date),
                time: Some(s.time.as_str().to_string()),
                service: Some(s.time.service().as_str().to_string()),
                total: Some(s.total()),
                available: Some(s.available_count()),
                zones: Some(
                    s.zones
                        .iter()
                        .map(|z| ZoneAvailabilityDto {
                            zone: z.zone.label().to_string(),
                            total: z.total,
                            available: z.available,
                        })
                        .collect(),
                ),
                tables: Some(
                    s.tables
                        .into_iter()
                        .map(|t| TableAvailabilityDto {
                            table: t.table.into(),
                            available: t.available,
                        })
                        .collect(),
                ),
            },
        }
    }
}
