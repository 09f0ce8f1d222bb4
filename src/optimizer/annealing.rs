//! Simulated annealing over slot assignments.
//!
//! # Algorithm
//!
//! 1. Place every request in a uniformly random slot.
//! 2. For a fixed number of iterations: propose a reassignment or swap,
//!    accept when `delta ≤ 0` or with probability `exp(-delta / T)`, keep
//!    the best plan seen, then cool `T *= cooling_rate`.
//! 3. Return the best plan. Its cost never exceeds the initial plan's.
//!
//! The loop never exits early; the iteration budget bounds the run.
//!
//! # Reference
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::cost::{breakdown_with, CostBreakdown, CostWeights};
use super::metrics::ImprovementMetrics;
use super::moves::{propose, random_plan, MoveKind};
use crate::error::{EngineError, EngineResult};
use crate::graph::ScheduleGraph;
use crate::models::{ScheduleAssignment, TimeSlot, WeatherForecast};
use crate::slots::generate;

/// Annealing schedule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Multiplicative cooling per iteration.
    pub cooling_rate: f64,
    /// Iterations to run.
    pub max_iterations: usize,
    /// Chance of proposing a swap instead of a reassignment.
    pub swap_probability: f64,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            max_iterations: 1000,
            swap_probability: 0.3,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the iteration budget.
    pub fn with_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Temperature after `iteration` cooling steps.
    pub fn temperature_at(&self, iteration: usize) -> f64 {
        self.initial_temperature * self.cooling_rate.powi(iteration as i32)
    }
}

/// Outcome of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best schedule found.
    pub schedule: ScheduleAssignment,
    /// Its cost.
    pub cost: f64,
    /// Its cost by term.
    pub breakdown: CostBreakdown,
    /// Cost of the random starting schedule.
    pub initial_cost: f64,
    /// What the schedule achieved.
    pub improvements: ImprovementMetrics,
    /// Iterations run.
    pub iterations: usize,
    /// Proposals accepted.
    pub accepted_moves: usize,
    /// Temperature after the last iteration.
    pub final_temperature: f64,
}

/// Assigns requests to slots by simulated annealing.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_burnsched::graph::ScheduleGraph;
/// use u_burnsched::models::{BurnRequest, Conflict, Severity, WeatherForecast};
/// use u_burnsched::optimizer::{AnnealingConfig, SimulatedAnnealingOptimizer};
///
/// let day = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
/// let reqs = vec![
///     BurnRequest::new("R1").with_window(day, "08:00", "12:00").with_priority(60.0),
///     BurnRequest::new("R2").with_window(day, "08:00", "12:00").with_priority(40.0),
/// ];
/// let graph = ScheduleGraph::build(&reqs, &[Conflict::new("R1", "R2", Severity::Critical, 90.0)]);
///
/// let optimizer = SimulatedAnnealingOptimizer::new(AnnealingConfig::default().with_seed(42));
/// let result = optimizer.optimize(&graph, day, day, &WeatherForecast::new()).unwrap();
/// assert!(result.cost <= result.initial_cost);
/// assert_eq!(result.improvements.total_requests, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealingOptimizer {
    config: AnnealingConfig,
    weights: CostWeights,
}

impl SimulatedAnnealingOptimizer {
    /// Creates an optimizer with default cost weights.
    pub fn new(config: AnnealingConfig) -> Self {
        Self {
            config,
            weights: CostWeights::default(),
        }
    }

    /// Sets the cost weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Annealing parameters in use.
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Cost weights in use.
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Optimizes over the slots of `start..=end`, seeding from the config.
    ///
    /// # Errors
    /// [`EngineError::EmptyRequestSet`] for an empty graph;
    /// [`EngineError::NoSlotsAvailable`] for an inverted range.
    pub fn optimize(
        &self,
        graph: &ScheduleGraph,
        start: NaiveDate,
        end: NaiveDate,
        weather: &WeatherForecast,
    ) -> EngineResult<OptimizationResult> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.optimize_with_rng(graph, start, end, weather, &mut rng)
    }

    /// Optimizes with a caller-supplied random source.
    #[instrument(skip_all, fields(requests = graph.len(), start = %start, end = %end))]
    pub fn optimize_with_rng<R: Rng>(
        &self,
        graph: &ScheduleGraph,
        start: NaiveDate,
        end: NaiveDate,
        weather: &WeatherForecast,
        rng: &mut R,
    ) -> EngineResult<OptimizationResult> {
        if graph.is_empty() {
            return Err(EngineError::EmptyRequestSet);
        }
        let slots = generate(start, end);
        if slots.is_empty() {
            return Err(EngineError::NoSlotsAvailable { start, end });
        }

        let evaluate = |plan: &[usize]| {
            breakdown_with(graph, weather, &self.weights, |i| {
                plan.get(i).and_then(|&s| slots.get(s))
            })
        };

        let mut plan = random_plan(graph.len(), slots.len(), rng);
        let initial_cost = evaluate(&plan).total;
        let mut current_cost = initial_cost;
        let mut best_plan = plan.clone();
        let mut best_cost = initial_cost;
        let mut temperature = self.config.initial_temperature;
        let mut accepted_moves = 0usize;

        debug!(initial_cost, slots = slots.len(), "annealing started");

        for iteration in 0..self.config.max_iterations {
            if let Some(mv) = propose(&plan, slots.len(), self.config.swap_probability, rng) {
                mv.apply(&mut plan);
                let candidate = evaluate(&plan).total;
                let delta = candidate - current_cost;

                let accept = delta <= 0.0
                    || (temperature > 0.0 && rng.random::<f64>() < (-delta / temperature).exp());
                if accept {
                    current_cost = candidate;
                    accepted_moves += 1;
                    if current_cost < best_cost {
                        best_cost = current_cost;
                        best_plan.clone_from(&plan);
                        trace!(iteration, best_cost, swap = mv.kind() == MoveKind::Swap, "new best");
                    }
                } else {
                    mv.undo(&mut plan);
                }
            }
            temperature *= self.config.cooling_rate;
        }

        let breakdown = evaluate(&best_plan);
        let schedule = to_schedule(graph, &slots, &best_plan);
        let improvements = ImprovementMetrics::calculate(&schedule, graph);

        info!(
            initial_cost,
            cost = breakdown.total,
            accepted_moves,
            conflicts_resolved = improvements.conflicts_resolved,
            "annealing complete"
        );

        Ok(OptimizationResult {
            schedule,
            cost: breakdown.total,
            breakdown,
            initial_cost,
            improvements,
            iterations: self.config.max_iterations,
            accepted_moves,
            final_temperature: temperature,
        })
    }
}

fn to_schedule(graph: &ScheduleGraph, slots: &[TimeSlot], plan: &[usize]) -> ScheduleAssignment {
    let mut schedule = ScheduleAssignment::new();
    for (node, &slot) in graph.nodes().iter().zip(plan) {
        if let Some(slot) = slots.get(slot) {
            schedule.assign(node.request_id.clone(), slot.clone());
        }
    }
    schedule
}
