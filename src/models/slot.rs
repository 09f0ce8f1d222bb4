//! Discrete burn time slots.
//!
//! # Time Model
//! A burn day is the 06:00–18:00 daylight window split into three
//! consecutive half-open periods:
//!
//! | Period | Window |
//! |--------|--------|
//! | morning | [06:00, 10:00) |
//! | midday | [10:00, 14:00) |
//! | afternoon | [14:00, 18:00) |
//!
//! A slot is identified by `"{YYYY-MM-DD}_{period}"`, so ids are stable
//! across runs and sort chronologically within a day only by period order.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named period of the burn day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPeriod {
    /// 06:00–10:00.
    Morning,
    /// 10:00–14:00.
    Midday,
    /// 14:00–18:00.
    Afternoon,
}

impl SlotPeriod {
    /// All periods in day order.
    pub const ALL: [SlotPeriod; 3] = [Self::Morning, Self::Midday, Self::Afternoon];

    /// Lower-case period name used in slot ids.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
        }
    }

    /// Start and end hour of the period.
    pub fn hours(&self) -> (u32, u32) {
        match self {
            Self::Morning => (6, 10),
            Self::Midday => (10, 14),
            Self::Afternoon => (14, 18),
        }
    }

    /// Parses a period name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for SlotPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One assignable burn window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Stable id, `"{date}_{period}"`.
    pub id: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Named period.
    pub period: SlotPeriod,
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates the slot for a date and period.
    pub fn new(date: NaiveDate, period: SlotPeriod) -> Self {
        let (start_h, end_h) = period.hours();
        Self {
            id: format!("{}_{}", date.format("%Y-%m-%d"), period.name()),
            date,
            period,
            start: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end_h, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Parses a slot id such as `"2025-08-25_morning"`.
    pub fn from_id(id: &str) -> Option<Self> {
        let (date, period) = id.split_once('_')?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(Self::new(date, SlotPeriod::from_name(period)?))
    }

    /// Window length in hours.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }

    /// Whether the two windows intersect: same date and `[start, end)` overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Whether a time of day falls inside the window.
    pub fn contains_time(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whole days from `date` to this slot's date (negative if earlier).
    pub fn days_after(&self, date: NaiveDate) -> i64 {
        (self.date - date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    #[test]
    fn test_slot_id_and_window() {
        let s = TimeSlot::new(day(), SlotPeriod::Midday);
        assert_eq!(s.id, "2025-08-25_midday");
        assert_eq!(s.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(s.end, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert!((s.duration_hours() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_adjacent_slots_do_not_overlap() {
        let m = TimeSlot::new(day(), SlotPeriod::Morning);
        let d = TimeSlot::new(day(), SlotPeriod::Midday);
        assert!(!m.overlaps(&d));
        assert!(!d.overlaps(&m));
        assert!(m.overlaps(&m.clone()));
    }

    #[test]
    fn test_same_period_other_day_does_not_overlap() {
        let a = TimeSlot::new(day(), SlotPeriod::Morning);
        let b = TimeSlot::new(day().succ_opt().unwrap(), SlotPeriod::Morning);
        assert!(!a.overlaps(&b));
        assert_eq!(b.days_after(day()), 1);
    }

    #[test]
    fn test_from_id_round_trip() {
        let s = TimeSlot::new(day(), SlotPeriod::Afternoon);
        assert_eq!(TimeSlot::from_id(&s.id), Some(s));
        assert!(TimeSlot::from_id("2025-08-25_evening").is_none());
        assert!(TimeSlot::from_id("garbage").is_none());
    }

    #[test]
    fn test_contains_time_half_open() {
        let s = TimeSlot::new(day(), SlotPeriod::Morning);
        assert!(s.contains_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap()));
        assert!(!s.contains_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
    }
}
