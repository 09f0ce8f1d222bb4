//! End-to-end planning: validate, score, detect, build, optimize.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::conflict::ConflictDetector;
use crate::encoding::{smoke_feature, terrain_feature};
use crate::error::EngineResult;
use crate::graph::ScheduleGraph;
use crate::models::{BurnRequest, Conflict, ResolutionStatus, WeatherForecast, WeatherReading};
use crate::optimizer::{OptimizationResult, SimulatedAnnealingOptimizer};
use crate::priority::PriorityScorer;
use crate::storage::{RequestStore, VectorIndex, WeatherProvider};
use crate::validation::{RequestValidator, ValidationError};

/// A request that failed validation and was left out of the plan.
#[derive(Debug, Clone)]
pub struct RejectedRequest {
    /// Id of the rejected request.
    pub request_id: String,
    /// Every validation failure found.
    pub errors: Vec<ValidationError>,
}

/// Everything a planning run produced.
#[derive(Debug, Clone)]
pub struct PlanningOutcome {
    /// Optimizer output.
    pub result: OptimizationResult,
    /// Accepted requests, scored and placed in their slots.
    pub requests: Vec<BurnRequest>,
    /// Detected conflicts, marked resolved where the schedule separates them.
    pub conflicts: Vec<Conflict>,
    /// Requests that failed validation.
    pub rejected: Vec<RejectedRequest>,
    /// Cancelled or completed requests left out of the plan.
    pub retired: Vec<String>,
}

/// Plans a batch of requests over `start..=end`.
///
/// Invalid requests are reported in [`PlanningOutcome::rejected`] and
/// cancelled or completed ones in [`PlanningOutcome::retired`]; neither fails
/// the run.
///
/// # Errors
/// [`crate::EngineError::EmptyRequestSet`] when no request passes validation;
/// [`crate::EngineError::NoSlotsAvailable`] for an inverted range.
#[instrument(skip_all, fields(requests = requests.len(), start = %start, end = %end))]
pub fn plan_burns(
    requests: &[BurnRequest],
    start: NaiveDate,
    end: NaiveDate,
    weather: &WeatherForecast,
    config: &EngineConfig,
) -> EngineResult<PlanningOutcome> {
    let validator = RequestValidator::new(config.validation.clone());
    let scorer = PriorityScorer::new(config.priority.clone());

    let mut accepted = Vec::with_capacity(requests.len());
    let mut rejected = Vec::new();
    let mut retired = Vec::new();
    for request in requests {
        if request.status.is_retired() {
            warn!(request = %request.id, status = %request.status, "retired request skipped");
            retired.push(request.id.clone());
            continue;
        }
        match validator.validate_all(request) {
            Ok(()) => {
                let mut request = request.clone();
                if request.priority_score.is_none() {
                    request.priority_score = Some(scorer.score(&request));
                }
                accepted.push(request);
            }
            Err(errors) => {
                warn!(request = %request.id, issues = errors.len(), "request rejected");
                rejected.push(RejectedRequest {
                    request_id: request.id.clone(),
                    errors,
                });
            }
        }
    }

    let detector = ConflictDetector::new(config.conflict.clone());
    let mut conflicts = detector.detect_requests(&accepted, weather);
    let graph = ScheduleGraph::build_with_scorer(&accepted, &conflicts, &scorer);

    let optimizer =
        SimulatedAnnealingOptimizer::new(config.annealing.clone()).with_weights(config.cost.clone());
    let result = optimizer.optimize(&graph, start, end, weather)?;

    for conflict in &mut conflicts {
        let separated = match (
            result.schedule.slot_for(&conflict.request_a),
            result.schedule.slot_for(&conflict.request_b),
        ) {
            (Some(a), Some(b)) => !a.overlaps(b),
            _ => false,
        };
        if separated {
            conflict.status = ResolutionStatus::Resolved;
        }
    }

    for request in &mut accepted {
        if let Some(slot) = result.schedule.slot_for(&request.id) {
            request.schedule(slot.clone())?;
        }
    }

    info!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        retired = retired.len(),
        conflicts = conflicts.len(),
        cost = result.cost,
        "planning complete"
    );

    Ok(PlanningOutcome {
        result,
        requests: accepted,
        conflicts,
        rejected,
        retired,
    })
}

/// Plans the stored requests dated `start..=end` and writes the outcome back.
///
/// Planned requests, their conflicts, the schedule, and each request's
/// terrain and smoke vectors are all stored. Cancelled and completed requests
/// are skipped and left untouched in the store.
pub fn plan_from_store<S>(
    store: &mut S,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<PlanningOutcome>
where
    S: RequestStore + VectorIndex + WeatherProvider,
{
    let requests = store.requests_between(start, end)?;
    let weather = store.forecast(start, end)?;
    let outcome = plan_burns(&requests, start, end, &weather, config)?;

    for request in &outcome.requests {
        let reading = request
            .requested_date
            .map_or_else(WeatherReading::neutral, |d| weather.reading_or_neutral(d));
        store.upsert_vector(terrain_feature(request)?)?;
        store.upsert_vector(smoke_feature(request, &reading)?)?;
        store.put_request(request.clone())?;
    }
    for conflict in &outcome.conflicts {
        store.put_conflict(conflict.clone())?;
    }
    store.save_schedule(&outcome.result.schedule)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{Polygon, RequestStatus, SlotPeriod, TimeSlot, VectorKind};
    use crate::storage::{DistanceMetric, MemoryStore};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, n).unwrap()
    }

    fn field(lon: f64, lat: f64) -> Polygon {
        let d = 0.004;
        Polygon::from_lon_lat(&[
            (lon, lat),
            (lon, lat + d),
            (lon + d, lat + d),
            (lon + d, lat),
            (lon, lat),
        ])
    }

    fn request(id: &str, lon: f64) -> BurnRequest {
        BurnRequest::new(id)
            .with_farm("F1", format!("{id}-field"))
            .with_geometry(field(lon, 38.50))
            .with_area(40.0)
            .with_fuel_load(8.0)
            .with_window(day(25), "08:00", "12:00")
    }

    fn seeded() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.annealing.seed = Some(42);
        config.annealing.max_iterations = 3000;
        config
    }

    #[test]
    fn test_plan_separates_neighbouring_burns() {
        let requests = vec![request("R1", -121.700), request("R2", -121.690), request("R3", -121.680)];
        let outcome = plan_burns(&requests, day(25), day(27), &WeatherForecast::new(), &seeded()).unwrap();

        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.result.improvements.total_requests, 3);
        assert!(!outcome.conflicts.is_empty());
        assert!(outcome.result.cost <= outcome.result.initial_cost);
        // Three same-day slots hold three mutually conflicting burns
        assert_eq!(outcome.result.cost, 0.0);
        assert!(outcome.conflicts.iter().all(|c| c.status == ResolutionStatus::Resolved));
        assert!(outcome
            .requests
            .iter()
            .all(|r| r.status == RequestStatus::Scheduled && r.priority_score.is_some()));
    }

    #[test]
    fn test_plan_reports_invalid_requests() {
        let mut bad = request("BAD", -121.6);
        bad.requested_end = Some("07:00".into());
        let requests = vec![request("R1", -121.7), bad];
        let outcome = plan_burns(&requests, day(25), day(26), &WeatherForecast::new(), &seeded()).unwrap();
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].request_id, "BAD");
        assert_eq!(outcome.result.schedule.len(), 1);
    }

    #[test]
    fn test_plan_skips_retired_requests() {
        let mut cancelled = request("R2", -121.69);
        cancelled.cancel().unwrap();
        let requests = vec![request("R1", -121.70), cancelled];
        let outcome = plan_burns(&requests, day(25), day(26), &WeatherForecast::new(), &seeded()).unwrap();

        assert_eq!(outcome.retired, ["R2"]);
        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.result.schedule.len(), 1);
        assert!(outcome.result.schedule.slot_for("R2").is_none());
        assert!(outcome.conflicts.is_empty());
        assert_eq!(outcome.requests.len(), 1);
    }

    #[test]
    fn test_plan_from_store_leaves_completed_requests() {
        let mut store = MemoryStore::new();
        let mut done = request("R2", -121.69);
        done.schedule(TimeSlot::new(day(25), SlotPeriod::Morning)).unwrap();
        done.complete().unwrap();
        store.put_request(request("R1", -121.70)).unwrap();
        store.put_request(done).unwrap();

        let outcome = plan_from_store(&mut store, day(25), day(26), &seeded()).unwrap();
        assert_eq!(outcome.retired, ["R2"]);
        assert!(outcome.result.schedule.slot_for("R1").is_some());

        let stored = store.get_request("R2").unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Completed);
        assert_eq!(stored.assigned_slot.map(|s| s.period), Some(SlotPeriod::Morning));
        assert!(store.load_schedule().unwrap().slot_for("R2").is_none());
    }

    #[test]
    fn test_engine_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineConfig>();
        assert_send_sync::<PlanningOutcome>();
        assert_send_sync::<ScheduleGraph>();
        assert_send_sync::<MemoryStore>();
        assert_send_sync::<SimulatedAnnealingOptimizer>();
    }

    #[test]
    fn test_plan_all_invalid() {
        let requests = vec![BurnRequest::new("R1")];
        let err = plan_burns(&requests, day(25), day(26), &WeatherForecast::new(), &seeded()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyRequestSet));
    }

    #[test]
    fn test_plan_from_store_writes_back() {
        let mut store = MemoryStore::new();
        for r in [request("R1", -121.70), request("R2", -121.69)] {
            store.put_request(r).unwrap();
        }
        let outcome = plan_from_store(&mut store, day(25), day(26), &seeded()).unwrap();
        assert_eq!(store.load_schedule().unwrap(), outcome.result.schedule);
        let stored = store.get_request("R1").unwrap().unwrap();
        assert!(stored.assigned_slot.is_some());
        assert_eq!(store.conflicts().count(), outcome.conflicts.len());

        let query = crate::encoding::smoke_vector("R1", &WeatherReading::neutral(), 40.0);
        let hits = store
            .find_nearest(VectorKind::Smoke, &query, 5, DistanceMetric::Cosine)
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance < 1e-9);
    }
}
