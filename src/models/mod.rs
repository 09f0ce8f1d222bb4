//! Burn scheduling domain models.
//!
//! Provides the core data types for representing burn coordination
//! problems and their solutions.
//!
//! # Domain Mappings
//!
//! | u-burnsched | Generic scheduling |
//! |-------------|--------------------|
//! | BurnRequest | Task |
//! | TimeSlot | Time window |
//! | Conflict | Pairwise incompatibility |
//! | ScheduleAssignment | Schedule |

mod conflict;
mod geometry;
mod request;
mod schedule;
mod slot;
mod vector;
mod weather;

pub use conflict::{Conflict, ResolutionStatus, Severity};
pub use geometry::{BoundingBox, Coordinate, Polygon, EARTH_RADIUS_KM};
pub use request::{
    parse_time_of_day, BurnPurpose, BurnRequest, FuelType, RequestStatus, TerrainAttributes,
};
pub use schedule::ScheduleAssignment;
pub use slot::{SlotPeriod, TimeSlot};
pub use vector::{FeatureVector, VectorKind, VALUE_BOUND};
pub use weather::{WeatherForecast, WeatherReading};
