//! Bookable time slots
//!
//! Half-hour granularity over two service windows. A time of day outside
//! this enumeration is not a slot and cannot be booked.

use chrono::NaiveTime;

/// `(label, hour, minute)` for every bookable slot, in chronological order
const SLOTS: [(&str, u32, u32); 17] = [
    ("11:00", 11, 0),
    ("11:30", 11, 30),
    ("12:00", 12, 0),
    ("12:30", 12, 30),
    ("13:00", 13, 0),
    ("13:30", 13, 30),
    ("14:00", 14, 0),
    ("14:30", 14, 30),
    ("18:00", 18, 0),
    ("18:30", 18, 30),
    ("19:00", 19, 0),
    ("19:30", 19, 30),
    ("20:00", 20, 0),
    ("20:30", 20, 30),
    ("21:00", 21, 0),
    ("21:30", 21, 30),
    ("22:00", 22, 0),
];

/// First dinner slot index
const DINNER_START: usize = 8;

/// Service window a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceWindow {
    Lunch,
    Dinner,
}

impl ServiceWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        }
    }
}

/// One of the fixed bookable times of day.
///
/// Only constructible from the enumeration, so holding a `TimeSlot`
/// means the time has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u8);

impl TimeSlot {
    /// Every slot in chronological order
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..SLOTS.len() as u8).map(TimeSlot)
    }

    /// Parse an exact `HH:MM` label. Returns `None` for anything not in the enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        SLOTS
            .iter()
            .position(|(label, _, _)| *label == s)
            .map(|i| TimeSlot(i as u8))
    }

    /// `HH:MM` label, also the persisted value
    pub fn as_str(&self) -> &'static str {
        SLOTS[self.0 as usize].0
    }

    /// Time of day the slot starts
    pub fn start_time(&self) -> NaiveTime {
        let (_, hour, minute) = SLOTS[self.0 as usize];
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn service(&self) -> ServiceWindow {
        if (self.0 as usize) < DINNER_START {
            ServiceWindow::Lunch
        } else {
            ServiceWindow::Dinner
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ──────────────────────────────────────────────────────
