//! Schedule cost function.
//!
//! # Terms
//!
//! | Term | Per | Amount |
//! |------|-----|--------|
//! | delay | request placed after its requested date | `days_late × delay_per_day × (priority_ceiling − priority)` |
//! | conflict | conflicting pair in overlapping slots | severity constant |
//! | weather | request, on its assigned date | wind and humidity penalties |
//!
//! Requests missing from the schedule contribute nothing.

use serde::{Deserialize, Serialize};

use crate::graph::ScheduleGraph;
use crate::models::{ScheduleAssignment, Severity, TimeSlot, WeatherForecast, WeatherReading};

/// Tunable cost constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Multiplier per day late.
    pub delay_per_day: f64,
    /// Priority is subtracted from this; 101 keeps a 100-priority delay non-free.
    pub priority_ceiling: f64,
    /// Critical conflict penalty.
    pub critical: f64,
    /// High conflict penalty.
    pub high: f64,
    /// Medium conflict penalty.
    pub medium: f64,
    /// Low conflict penalty.
    pub low: f64,
    /// Wind speed (mph) above which the wind penalty applies.
    pub wind_limit_mph: f64,
    /// Penalty for excessive wind.
    pub wind_penalty: f64,
    /// Humidity (%) below which the dryness penalty applies.
    pub humidity_floor: f64,
    /// Penalty for low humidity.
    pub humidity_penalty: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            delay_per_day: 10.0,
            priority_ceiling: 101.0,
            critical: 100.0,
            high: 50.0,
            medium: 20.0,
            low: 5.0,
            wind_limit_mph: 8.0,
            wind_penalty: 20.0,
            humidity_floor: 30.0,
            humidity_penalty: 25.0,
        }
    }
}

impl CostWeights {
    /// Penalty for a conflicting pair sharing a slot.
    pub fn conflict_penalty(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Penalty for burning under `reading`.
    pub fn weather_penalty(&self, reading: &WeatherReading) -> f64 {
        let mut penalty = 0.0;
        if reading.wind_speed > self.wind_limit_mph {
            penalty += self.wind_penalty;
        }
        if reading.humidity < self.humidity_floor {
            penalty += self.humidity_penalty;
        }
        penalty
    }

    /// Delay penalty for a request of `priority` placed `days_late` days late.
    pub fn delay_penalty(&self, days_late: i64, priority: f64) -> f64 {
        if days_late <= 0 {
            return 0.0;
        }
        days_late as f64 * self.delay_per_day * (self.priority_ceiling - priority).max(0.0)
    }
}

/// Cost split by term.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Lateness penalty, weighted by priority.
    pub delay: f64,
    /// Penalty for conflicting pairs sharing a slot.
    pub conflict: f64,
    /// Wind and humidity penalty.
    pub weather: f64,
    /// Sum of the three terms.
    pub total: f64,
}

/// Cost of a schedule, split by term.
pub fn evaluate(
    schedule: &ScheduleAssignment,
    graph: &ScheduleGraph,
    weather: &WeatherForecast,
    weights: &CostWeights,
) -> CostBreakdown {
    breakdown_with(graph, weather, weights, |idx| {
        graph
            .node(idx)
            .and_then(|node| schedule.slot_for(&node.request_id))
    })
}

/// Total cost of a schedule (≥ 0).
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_burnsched::graph::ScheduleGraph;
/// use u_burnsched::models::{BurnRequest, Conflict, ScheduleAssignment, Severity, SlotPeriod, TimeSlot, WeatherForecast};
/// use u_burnsched::optimizer::{cost, CostWeights};
///
/// let day = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
/// let reqs = vec![
///     BurnRequest::new("R1").with_window(day, "08:00", "10:00").with_priority(50.0),
///     BurnRequest::new("R2").with_window(day, "08:00", "10:00").with_priority(50.0),
/// ];
/// let graph = ScheduleGraph::build(&reqs, &[Conflict::new("R1", "R2", Severity::High, 60.0)]);
/// let slot = TimeSlot::new(day, SlotPeriod::Morning);
/// let together = ScheduleAssignment::new().with("R1", slot.clone()).with("R2", slot);
/// assert_eq!(cost(&together, &graph, &WeatherForecast::new(), &CostWeights::default()), 50.0);
/// ```
pub fn cost(
    schedule: &ScheduleAssignment,
    graph: &ScheduleGraph,
    weather: &WeatherForecast,
    weights: &CostWeights,
) -> f64 {
    evaluate(schedule, graph, weather, weights).total
}

/// Shared evaluation over any request-index → slot mapping.
pub(crate) fn breakdown_with<'a>(
    graph: &ScheduleGraph,
    weather: &WeatherForecast,
    weights: &CostWeights,
    slot_of: impl Fn(usize) -> Option<&'a TimeSlot>,
) -> CostBreakdown {
    let mut out = CostBreakdown::default();

    for (idx, node) in graph.nodes().iter().enumerate() {
        let Some(slot) = slot_of(idx) else {
            continue;
        };
        if let Some(requested) = node.requested_date {
            out.delay += weights.delay_penalty(slot.days_after(requested), node.priority);
        }
        out.weather += weights.weather_penalty(&weather.reading_or_neutral(slot.date));
    }

    for (a, edge) in graph.conflict_pairs() {
        if let (Some(sa), Some(sb)) = (slot_of(a), slot_of(edge.neighbor)) {
            if sa.overlaps(sb) {
                out.conflict += weights.conflict_penalty(edge.severity);
            }
        }
    }

    out.total = out.delay + out.conflict + out.weather;
    out
}
