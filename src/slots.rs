//! Time slot generation.

use chrono::NaiveDate;

use crate::models::{SlotPeriod, TimeSlot};

/// Every slot for an inclusive date range, in chronological order.
///
/// Each day yields morning (06–10), midday (10–14), and afternoon (14–18).
/// An inverted range yields nothing.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_burnsched::slots::generate;
///
/// let d = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
/// let slots = generate(d, d.succ_opt().unwrap());
/// assert_eq!(slots.len(), 6);
/// assert_eq!(slots[0].id, "2025-08-25_morning");
/// ```
pub fn generate(start_date: NaiveDate, end_date: NaiveDate) -> Vec<TimeSlot> {
    if end_date < start_date {
        return Vec::new();
    }
    start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .flat_map(|d| SlotPeriod::ALL.into_iter().map(move |p| TimeSlot::new(d, p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    #[test]
    fn test_generate_three_per_day() {
        let slots = generate(d(25), d(27));
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0].id, "2025-08-25_morning");
        assert_eq!(slots[1].id, "2025-08-25_midday");
        assert_eq!(slots[2].id, "2025-08-25_afternoon");
        assert_eq!(slots[8].id, "2025-08-27_afternoon");
    }

    #[test]
    fn test_generate_windows() {
        let slots = generate(d(25), d(25));
        let hm = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert_eq!((slots[0].start, slots[0].end), (hm(6), hm(10)));
        assert_eq!((slots[1].start, slots[1].end), (hm(10), hm(14)));
        assert_eq!((slots[2].start, slots[2].end), (hm(14), hm(18)));
        // Adjacent windows touch but do not overlap
        assert!(!slots[0].overlaps(&slots[1]));
        assert!(slots[0].overlaps(&slots[0]));
    }

    #[test]
    fn test_generate_inverted_range() {
        assert!(generate(d(27), d(25)).is_empty());
    }

    #[test]
    fn test_generate_month_boundary() {
        let slots = generate(d(31), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[3].id, "2025-09-01_morning");
    }
}
