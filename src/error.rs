//! Engine error types.
//!
//! Validation failures have their own type ([`crate::validation::ValidationError`]);
//! everything else the engine can report is an [`EngineError`].

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the encoding, conflict, and optimization stages.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Two vectors of different length were compared.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the left operand.
        expected: usize,
        /// Length of the right operand.
        actual: usize,
    },

    /// A feature vector broke its length or finiteness invariant.
    #[error("invalid feature vector: {0}")]
    InvalidVector(String),

    /// The optimizer was handed no requests.
    #[error("no burn requests to schedule")]
    EmptyRequestSet,

    /// The date range produced no time slots.
    #[error("no time slots available between {start} and {end}")]
    NoSlotsAvailable {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A request id is not part of the problem instance.
    #[error("unknown burn request '{0}'")]
    UnknownRequest(String),

    /// A lifecycle transition was attempted from a retired state.
    #[error("request '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        /// Request id.
        id: String,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// A storage or weather collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Engine configuration could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}
