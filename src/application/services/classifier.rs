//! Temporal classification of reservations
//!
//! Pure functions of `now`. Whether a reservation is upcoming or past is
//! always computed here at read time and never written back to `status`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Reservation, ReservationStatus};

/// Position of a reservation relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Temporal {
    Upcoming,
    Past,
}

/// A reservation is past once its slot has started, or as soon as it is terminal.
///
/// A cancelled reservation for next week is past.
pub fn is_past(r: &Reservation, now: NaiveDateTime) -> bool {
    now >= r.starts_at() || r.status.is_terminal()
}

pub fn classify(r: &Reservation, now: NaiveDateTime) -> Temporal {
    if is_past(r, now) {
        Temporal::Past
    } else {
        Temporal::Upcoming
    }
}

/// Whether the owner may still cancel: active, and the slot is not strictly in the past.
pub fn can_cancel(r: &Reservation, now: NaiveDateTime) -> bool {
    r.is_active() && r.starts_at() >= now
}

/// Items split by `classify`, each side keeping its input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T> {
    pub upcoming: Vec<T>,
    pub past: Vec<T>,
}

pub fn partition<T: AsRef<Reservation>>(items: Vec<T>, now: NaiveDateTime) -> Partitioned<T> {
    let (past, upcoming) = items
        .into_iter()
        .partition(|item| is_past(item.as_ref(), now));
    Partitioned { upcoming, past }
}

/// Per-user statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReservationSummary {
    pub total: usize,
    /// Strictly in the future and not cancelled
    pub upcoming_count: usize,
    /// Persisted `completed` status only, never inferred from time
    pub completed_count: usize,
}

pub fn summarize<T: AsRef<Reservation>>(items: &[T], now: NaiveDateTime) -> ReservationSummary {
    items
        .iter()
        .map(AsRef::as_ref)
        .fold(ReservationSummary::default(), |mut acc, r| {
            acc.total += 1;
            if r.starts_at() > now && r.status != ReservationStatus::Cancelled {
                acc.upcoming_count += 1;
            }
            if r.status == ReservationStatus::Completed {
                acc.completed_count += 1;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    use super::*;
    use crate::domain::TimeSlot;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    fn at(days: i64, time: &str, status: ReservationStatus) -> Reservation {
        let mut r = Reservation::confirmed(
            Uuid::new_v4(),
            Uuid::new_v4(),
            now().date() + Duration::days(days),
            TimeSlot::parse(time).unwrap(),
            2,
            None,
        );
        r.status = status;
        r
    }

    #[test]
    fn yesterday_confirmed_is_past() {
        let r = at(-1, "19:00", ReservationStatus::Confirmed);
        assert_eq!(classify(&r, now()), Temporal::Past);
    }

    #[test]
    fn cancellation_overrides_future_date() {
        let r = at(1, "19:00", ReservationStatus::Cancelled);
        assert_eq!(classify(&r, now()), Temporal::Past);
        assert!(!can_cancel(&r, now()));
    }

    #[test]
    fn slot_starting_now_is_past_but_still_cancellable() {
        let mut r = at(0, "19:00", ReservationStatus::Confirmed);
        let starts = r.starts_at();
        assert!(is_past(&r, starts));
        assert!(can_cancel(&r, starts));
        assert!(!can_cancel(&r, starts + Duration::minutes(1)));

        r.status = ReservationStatus::Pending;
        assert_eq!(classify(&r, starts - Duration::minutes(1)), Temporal::Upcoming);
    }

    #[test]
    fn partition_keeps_input_order() {
        let items = vec![
            at(3, "19:00", ReservationStatus::Confirmed),
            at(-2, "12:00", ReservationStatus::Confirmed),
            at(1, "11:00", ReservationStatus::Pending),
            at(2, "18:00", ReservationStatus::Cancelled),
        ];
        let ids: Vec<Uuid> = items.iter().map(|r| r.id).collect();

        let split = partition(items, now());
        assert_eq!(
            split.upcoming.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ids[0], ids[2]]
        );
        assert_eq!(
            split.past.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ids[1], ids[3]]
        );
    }

    #[test]
    fn summary_counts_only_persisted_completion() {
        let items = vec![
            at(1, "19:00", ReservationStatus::Confirmed),
            at(2, "12:00", ReservationStatus::Confirmed),
            at(1, "20:00", ReservationStatus::Cancelled),
            at(-1, "19:00", ReservationStatus::Confirmed),
            at(-3, "18:00", ReservationStatus::Completed),
        ];
        assert_eq!(
            summarize(&items, now()),
            ReservationSummary {
                total: 5,
                upcoming_count: 2,
                completed_count: 1,
            }
        );
    }

    #[test]
    fn empty_summary_is_zero() {
        let items: Vec<Reservation> = Vec::new();
        assert_eq!(summarize(&items, now()), ReservationSummary::default());
    }
}
