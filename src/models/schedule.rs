//! Schedule (solution) model.
//!
//! A schedule maps every burn request to exactly one time slot.
//! Several requests may share a slot; whether that is acceptable is
//! the cost function's business, not the model's.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::TimeSlot;

/// Request → slot assignment.
///
/// Backed by an ordered map so iteration (and therefore serialization and
/// logging) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    assignments: BTreeMap<String, TimeSlot>,
}

impl ScheduleAssignment {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns (or reassigns) a request to a slot. Returns the previous slot.
    pub fn assign(&mut self, request_id: impl Into<String>, slot: TimeSlot) -> Option<TimeSlot> {
        self.assignments.insert(request_id.into(), slot)
    }

    /// Builder form of [`assign`](Self::assign).
    pub fn with(mut self, request_id: impl Into<String>, slot: TimeSlot) -> Self {
        self.assign(request_id, slot);
        self
    }

    /// Removes a request from the schedule.
    pub fn unassign(&mut self, request_id: &str) -> Option<TimeSlot> {
        self.assignments.remove(request_id)
    }

    /// Slot assigned to a request.
    pub fn slot_for(&self, request_id: &str) -> Option<&TimeSlot> {
        self.assignments.get(request_id)
    }

    /// Iterates `(request_id, slot)` in request id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeSlot)> {
        self.assignments.iter().map(|(id, slot)| (id.as_str(), slot))
    }

    /// Request ids assigned to a slot.
    pub fn requests_in_slot(&self, slot_id: &str) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|(_, slot)| slot.id == slot_id)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Number of requests per occupied slot id.
    pub fn slot_load(&self) -> HashMap<&str, usize> {
        let mut load: HashMap<&str, usize> = HashMap::new();
        for slot in self.assignments.values() {
            *load.entry(slot.id.as_str()).or_insert(0) += 1;
        }
        load
    }

    /// Whether every id in `request_ids` has a slot.
    pub fn is_complete<'a>(&self, request_ids: impl IntoIterator<Item = &'a str>) -> bool {
        request_ids
            .into_iter()
            .all(|id| self.assignments.contains_key(id))
    }

    /// Number of assigned requests.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotPeriod;
    use chrono::NaiveDate;

    fn slot(period: SlotPeriod) -> TimeSlot {
        TimeSlot::new(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(), period)
    }

    fn sample_schedule() -> ScheduleAssignment {
        ScheduleAssignment::new()
            .with("R1", slot(SlotPeriod::Morning))
            .with("R2", slot(SlotPeriod::Morning))
            .with("R3", slot(SlotPeriod::Afternoon))
    }

    #[test]
    fn test_assignment_lookup() {
        let s = sample_schedule();
        assert_eq!(s.len(), 3);
        assert_eq!(s.slot_for("R3").unwrap().period, SlotPeriod::Afternoon);
        assert!(s.slot_for("R9").is_none());
    }

    #[test]
    fn test_reassign_returns_previous() {
        let mut s = sample_schedule();
        let prev = s.assign("R1", slot(SlotPeriod::Midday));
        assert_eq!(prev.unwrap().period, SlotPeriod::Morning);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_requests_in_slot_and_load() {
        let s = sample_schedule();
        assert_eq!(s.requests_in_slot("2025-08-25_morning"), vec!["R1", "R2"]);
        let load = s.slot_load();
        assert_eq!(load["2025-08-25_morning"], 2);
        assert_eq!(load["2025-08-25_afternoon"], 1);
    }

    #[test]
    fn test_completeness() {
        let s = sample_schedule();
        assert!(s.is_complete(["R1", "R2", "R3"]));
        assert!(!s.is_complete(["R1", "R4"]));
    }

    #[test]
    fn test_serde_round_trip() {
        let s = sample_schedule();
        let json = serde_json::to_string(&s).unwrap();
        let back: ScheduleAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
