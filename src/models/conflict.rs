//! Pairwise smoke conflicts between burn requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How strongly two burns' smoke signatures overlap.
///
/// Ordered: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Similarity below 0.90.
    Low,
    /// Similarity in [0.90, 0.95).
    Medium,
    /// Similarity in [0.95, 0.99).
    High,
    /// Similarity of 0.99 or more.
    Critical,
}

impl Severity {
    /// Tier for a cosine similarity.
    ///
    /// Non-decreasing in `similarity`.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.99 {
            Self::Critical
        } else if similarity >= 0.95 {
            Self::High
        } else if similarity >= 0.90 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Whether a conflict still needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Both burns may still share a slot.
    #[default]
    Open,
    /// The schedule keeps the burns apart.
    Resolved,
}

/// A detected conflict between two requests.
///
/// The pair is unordered; [`Conflict::new`] stores the ids in lexicographic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Lexicographically smaller request id.
    pub request_a: String,
    /// Lexicographically larger request id.
    pub request_b: String,
    /// Severity tier.
    pub severity: Severity,
    /// Similarity the tier was derived from.
    pub similarity: f64,
    /// Estimated combined PM2.5 (µg/m³) if both burn together.
    pub combined_pm25: f64,
    /// Resolution state.
    pub status: ResolutionStatus,
}

impl Conflict {
    /// Creates an open conflict.
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        severity: Severity,
        combined_pm25: f64,
    ) -> Self {
        let (a, b) = (a.into(), b.into());
        let (request_a, request_b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            request_a,
            request_b,
            severity,
            similarity: 0.0,
            combined_pm25,
            status: ResolutionStatus::Open,
        }
    }

    /// Records the similarity behind the tier.
    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    /// Whether the conflict involves `request_id`.
    pub fn involves(&self, request_id: &str) -> bool {
        self.request_a == request_id || self.request_b == request_id
    }

    /// The other side of the pair.
    pub fn other(&self, request_id: &str) -> Option<&str> {
        if self.request_a == request_id {
            Some(&self.request_b)
        } else if self.request_b == request_id {
            Some(&self.request_a)
        } else {
            None
        }
    }

    /// Whether this is a degenerate self-pair.
    pub fn is_self_pair(&self) -> bool {
        self.request_a == self.request_b
    }
}
