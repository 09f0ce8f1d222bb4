//! Conflict detection between burn requests.
//!
//! Two burns conflict when their smoke signatures are similar enough that
//! burning them together would stack smoke over the same receptors.
//!
//! # Modules
//!
//! - [`similarity`]: cosine similarity and distances
//! - [`detector`]: pairwise and batch detection with severity tiers
//! - [`exposure`]: summed plume concentration at a receptor

pub mod detector;
pub mod exposure;
pub mod similarity;

pub use detector::{detect_conflict, ConflictConfig, ConflictDetector};
pub use exposure::{cumulative_exposure, ActiveBurn, ExposureEstimate, HazardTier};
pub use similarity::{cosine_distance, l2_distance, similarity};
