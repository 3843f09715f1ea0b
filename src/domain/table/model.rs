//! Table domain entity

use uuid::Uuid;

/// Seating zone, in fixed display and grouping order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Zone {
    WindowView,
    MainHall,
    GardenSection,
    PrivateDining,
}

impl Zone {
    /// All zones in display order
    pub const ALL: [Zone; 4] = [
        Zone::WindowView,
        Zone::MainHall,
        Zone::GardenSection,
        Zone::PrivateDining,
    ];

    /// Display label, also the persisted value
    pub fn label(&self) -> &'static str {
        match self {
            Self::WindowView => "Window View",
            Self::MainHall => "Main Hall",
            Self::GardenSection => "Garden Section",
            Self::PrivateDining => "Private Dining",
        }
    }

    /// Parse a zone from its label or its identifier form
    /// (`"Garden Section"`, `"GardenSection"` and `"garden_section"` are all accepted).
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "windowview" => Some(Self::WindowView),
            "mainhall" => Some(Self::MainHall),
            "gardensection" => Some(Self::GardenSection),
            "privatedining" => Some(Self::PrivateDining),
            _ => None,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A physical table in the dining room.
///
/// Immutable once created; owned by the table catalog and never created
/// or removed by the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Opaque identity
    pub id: Uuid,
    /// Unique table number, used for display and ordering
    pub number: i32,
    /// Number of seats
    pub capacity: i32,
    /// Seating zone
    pub location: Zone,
}

impl Table {
    pub fn new(number: i32, capacity: i32, location: Zone) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            capacity,
            location,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_order_matches_floor_layout() {
        let labels: Vec<&str> = Zone::ALL.iter().map(|z| z.label()).collect();
        assert_eq!(
            labels,
            vec!["Window View", "Main Hall", "Garden Section", "Private Dining"]
        );
        assert!(Zone::WindowView < Zone::PrivateDining);
    }

    #[test]
    fn zone_parse_accepts_label_and_identifier_forms() {
        assert_eq!(Zone::parse("Garden Section"), Some(Zone::GardenSection));
        assert_eq!(Zone::parse("GardenSection"), Some(Zone::GardenSection));
        assert_eq!(Zone::parse("private_dining"), Some(Zone::PrivateDining));
        assert_eq!(Zone::parse("Rooftop"), None);
    }

    #[test]
    fn zone_label_parses_back() {
        for zone in Zone::ALL {
            assert_eq!(Zone::parse(zone.label()), Some(zone));
        }
    }

    #[test]
    fn new_table_gets_fresh_id() {
        let a = Table::new(12, 4, Zone::GardenSection);
        let b = Table::new(12, 4, Zone::GardenSection);
        assert_ne!(a.id, b.id);
        assert_eq!(a.location.to_string(), "Garden Section");
    }
}
