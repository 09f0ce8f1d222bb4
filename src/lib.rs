//! Smoke-aware scheduling for agricultural burns.
//!
//! Farms request burn windows; neighbouring burns under similar weather put
//! overlapping smoke plumes over the same air. This crate encodes requests and
//! weather as fixed-length vectors, detects smoke conflicts between requests,
//! and assigns each request a time slot so that conflicting burns are
//! separated while keeping delay and poor-weather exposure low.
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`models`] | Domain types: `BurnRequest`, `WeatherReading`, `TimeSlot`, `Conflict`, `ScheduleAssignment` |
//! | [`validation`] | Structural, geometric, and temporal checks on requests |
//! | [`encoding`] | Terrain (32), smoke (64), and weather (128) vector encoders |
//! | [`dispersion`] | Gaussian plume model with Pasquill-Gifford coefficients |
//! | [`conflict`] | Cosine similarity, pairwise conflict detection, cumulative exposure |
//! | [`priority`] | Request priority scoring |
//! | [`slots`] | Time slot generation over a date range |
//! | [`graph`] | Conflict graph over a request set |
//! | [`optimizer`] | Cost model and simulated annealing |
//! | [`suggest`] | Alternative slot ranking for a single request |
//! | [`storage`] | Persistence and weather collaborator traits, in-memory store |
//! | [`config`] | JSON-loadable engine settings |
//! | [`pipeline`] | Validate, score, detect, and optimize in one call |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_burnsched::models::{BurnRequest, Polygon, WeatherForecast};
//! use u_burnsched::{plan_burns, EngineConfig};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
//! let field = Polygon::from_lon_lat(&[
//!     (-121.70, 38.50), (-121.70, 38.504), (-121.696, 38.504), (-121.696, 38.50), (-121.70, 38.50),
//! ]);
//! let request = BurnRequest::new("R1")
//!     .with_farm("F1", "north")
//!     .with_geometry(field)
//!     .with_area(40.0)
//!     .with_window(day, "08:00", "12:00");
//!
//! let mut config = EngineConfig::default();
//! config.annealing.seed = Some(1);
//! let outcome = plan_burns(&[request], day, day, &WeatherForecast::new(), &config).unwrap();
//! assert!(outcome.result.schedule.slot_for("R1").is_some());
//! ```
//!
//! # References
//!
//! - Turner (1994), "Workbook of Atmospheric Dispersion Estimates"
//! - Pasquill (1961), "The estimation of the dispersion of windborne material"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

pub mod config;
pub mod conflict;
pub mod dispersion;
pub mod encoding;
pub mod error;
pub mod graph;
pub mod models;
pub mod optimizer;
pub mod pipeline;
pub mod priority;
pub mod slots;
pub mod storage;
pub mod suggest;
pub mod validation;

pub use config::EngineConfig;
pub use conflict::{cumulative_exposure, detect_conflict, similarity, ConflictDetector};
pub use encoding::{smoke_vector, terrain_vector, weather_embedding};
pub use error::{EngineError, EngineResult};
pub use graph::ScheduleGraph;
pub use optimizer::{cost, SimulatedAnnealingOptimizer};
pub use pipeline::{plan_burns, plan_from_store, PlanningOutcome};
pub use priority::score;
pub use slots::generate;
pub use storage::MemoryStore;
pub use suggest::AlternativeSlotSuggester;
pub use validation::validate;
