//! Slot assignment optimization.
//!
//! # Modules
//!
//! - [`cost`]: schedule cost function and its weights
//! - [`annealing`]: simulated annealing driver
//! - [`moves`]: reassignment and swap neighborhoods
//! - [`metrics`]: improvement metrics for a finished schedule
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use u_burnsched::graph::ScheduleGraph;
//! use u_burnsched::models::{BurnRequest, WeatherForecast};
//! use u_burnsched::optimizer::{AnnealingConfig, SimulatedAnnealingOptimizer};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
//! let graph = ScheduleGraph::build(&[BurnRequest::new("R1").with_window(day, "08:00", "12:00")], &[]);
//! let result = SimulatedAnnealingOptimizer::new(AnnealingConfig::default().with_seed(1))
//!     .optimize(&graph, day, day, &WeatherForecast::new())
//!     .unwrap();
//! assert_eq!(result.cost, 0.0);
//! ```

pub mod annealing;
pub mod cost;
pub mod metrics;
pub mod moves;

pub use annealing::{AnnealingConfig, OptimizationResult, SimulatedAnnealingOptimizer};
pub use cost::{cost, evaluate, CostBreakdown, CostWeights};
pub use metrics::ImprovementMetrics;
pub use moves::MoveKind;
