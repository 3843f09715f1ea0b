//! Wall-clock source
//!
//! The core never reads the clock itself: every temporal operation takes
//! `now` as a parameter. Outer layers read it once per request from a `Clock`.

use chrono::{Local, NaiveDateTime};

/// Source of "now" in restaurant local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
