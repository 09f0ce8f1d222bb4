//! Alternative slot suggestions for a single request.
//!
//! Each candidate slot scores out of 100:
//!
//! - **conflict freedom** (60): share of the request's conflict weight whose
//!   neighbors sit outside the candidate slot
//! - **weather suitability** (40): share of the weather penalty avoided on
//!   the slot's date

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::graph::ScheduleGraph;
use crate::models::{ScheduleAssignment, TimeSlot, WeatherForecast};
use crate::optimizer::CostWeights;
use crate::slots::generate;

const CONFLICT_SHARE: f64 = 60.0;
const WEATHER_SHARE: f64 = 40.0;

/// Textual tier for a suggestion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Recommendation {
    /// Below 40.
    Suboptimal,
    /// 40 or more.
    Acceptable,
    /// 60 or more.
    Good,
    /// 80 or more.
    Excellent,
}

impl Recommendation {
    /// Tier for a score in `[0, 100]`.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Acceptable
        } else {
            Self::Suboptimal
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
            Self::Suboptimal => "Suboptimal",
        };
        f.write_str(name)
    }
}

/// A candidate slot for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSuggestion {
    /// Candidate slot.
    pub slot: TimeSlot,
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Tier of `score`.
    pub recommendation: Recommendation,
}

/// Ranks slots in a date range for requests of a scheduled problem.
#[derive(Debug)]
pub struct AlternativeSlotSuggester<'a> {
    graph: &'a ScheduleGraph,
    schedule: &'a ScheduleAssignment,
    weather: &'a WeatherForecast,
    weights: CostWeights,
    slots: Vec<TimeSlot>,
}

impl<'a> AlternativeSlotSuggester<'a> {
    /// Creates a suggester over the slots of `start..=end`.
    pub fn new(
        graph: &'a ScheduleGraph,
        schedule: &'a ScheduleAssignment,
        weather: &'a WeatherForecast,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            graph,
            schedule,
            weather,
            weights: CostWeights::default(),
            slots: generate(start, end),
        }
    }

    /// Sets the weights used for conflict and weather shares.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Up to `count` slots, best first, excluding the request's current slot.
    ///
    /// Equal scores keep chronological order.
    ///
    /// # Errors
    /// [`EngineError::UnknownRequest`] if the request is not in the graph.
    pub fn suggest(&self, request_id: &str, count: usize) -> EngineResult<Vec<SlotSuggestion>> {
        let idx = self
            .graph
            .index_of(request_id)
            .ok_or_else(|| EngineError::UnknownRequest(request_id.to_string()))?;
        let current = self.schedule.slot_for(request_id);

        let mut suggestions: Vec<SlotSuggestion> = self
            .slots
            .iter()
            .filter(|slot| current.map_or(true, |c| c.id != slot.id))
            .map(|slot| {
                let score = (self.conflict_score(idx, slot) + self.weather_score(slot))
                    .clamp(0.0, 100.0);
                SlotSuggestion {
                    slot: slot.clone(),
                    score,
                    recommendation: Recommendation::from_score(score),
                }
            })
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions.truncate(count);
        Ok(suggestions)
    }

    fn conflict_score(&self, idx: usize, slot: &TimeSlot) -> f64 {
        let Some(node) = self.graph.node(idx) else {
            return 0.0;
        };
        let mut total = 0.0;
        let mut clashing = 0.0;
        for edge in &node.conflicts {
            let penalty = self.weights.conflict_penalty(edge.severity);
            total += penalty;
            let neighbor_slot = self
                .graph
                .node(edge.neighbor)
                .and_then(|n| self.schedule.slot_for(&n.request_id));
            if neighbor_slot.is_some_and(|s| s.overlaps(slot)) {
                clashing += penalty;
            }
        }
        if total <= 0.0 {
            CONFLICT_SHARE
        } else {
            CONFLICT_SHARE * (1.0 - clashing / total)
        }
    }

    fn weather_score(&self, slot: &TimeSlot) -> f64 {
        let worst = self.weights.wind_penalty + self.weights.humidity_penalty;
        if worst <= 0.0 {
            return WEATHER_SHARE;
        }
        let penalty = self
            .weights
            .weather_penalty(&self.weather.reading_or_neutral(slot.date));
        WEATHER_SHARE * (1.0 - penalty / worst).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BurnRequest, Conflict, Severity, SlotPeriod, WeatherReading};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, n).unwrap()
    }

    fn setup() -> (ScheduleGraph, ScheduleAssignment) {
        let reqs: Vec<_> = ["A", "B"]
            .iter()
            .map(|id| BurnRequest::new(*id).with_window(day(25), "08:00", "12:00"))
            .collect();
        let graph = ScheduleGraph::build(&reqs, &[Conflict::new("A", "B", Severity::High, 60.0)]);
        let schedule = ScheduleAssignment::new()
            .with("A", TimeSlot::new(day(25), SlotPeriod::Morning))
            .with("B", TimeSlot::new(day(25), SlotPeriod::Midday));
        (graph, schedule)
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(Recommendation::from_score(100.0), Recommendation::Excellent);
        assert_eq!(Recommendation::from_score(80.0), Recommendation::Excellent);
        assert_eq!(Recommendation::from_score(60.0), Recommendation::Good);
        assert_eq!(Recommendation::from_score(40.0), Recommendation::Acceptable);
        assert_eq!(Recommendation::from_score(39.9), Recommendation::Suboptimal);
        assert_eq!(Recommendation::Good.to_string(), "Good");
    }

    #[test]
    fn test_suggest_ranks_and_excludes_current() {
        let (graph, schedule) = setup();
        let weather = WeatherForecast::new().with_reading(day(26), WeatherReading::new(15.0, 0.0, 20.0, 95.0));
        let suggester = AlternativeSlotSuggester::new(&graph, &schedule, &weather, day(25), day(26));

        let all = suggester.suggest("A", 10).unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|s| s.slot.id != "2025-08-25_morning"));
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));

        // Clean day, no clash: full marks, first in chronological order
        assert_eq!(all[0].slot.id, "2025-08-25_afternoon");
        assert_eq!(all[0].score, 100.0);
        assert_eq!(all[0].recommendation, Recommendation::Excellent);

        // Sharing B's slot loses the conflict share
        let midday = all.iter().find(|s| s.slot.id == "2025-08-25_midday").unwrap();
        assert_eq!(midday.score, 40.0);
        assert_eq!(midday.recommendation, Recommendation::Acceptable);

        // Windy, dry day loses the weather share
        let bad_day = all.iter().find(|s| s.slot.date == day(26)).unwrap();
        assert_eq!(bad_day.score, 60.0);
    }

    #[test]
    fn test_suggest_respects_count() {
        let (graph, schedule) = setup();
        let weather = WeatherForecast::new();
        let suggester = AlternativeSlotSuggester::new(&graph, &schedule, &weather, day(25), day(27));
        assert_eq!(suggester.suggest("B", 3).unwrap().len(), 3);
        assert!(suggester.suggest("B", 0).unwrap().is_empty());
    }

    #[test]
    fn test_suggest_unknown_request() {
        let (graph, schedule) = setup();
        let weather = WeatherForecast::new();
        let suggester = AlternativeSlotSuggester::new(&graph, &schedule, &weather, day(25), day(25));
        assert!(matches!(
            suggester.suggest("Z", 3),
            Err(EngineError::UnknownRequest(id)) if id == "Z"
        ));
    }
}
