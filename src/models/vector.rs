//! Tagged feature vectors.
//!
//! Every component is finite and lies in [`VALUE_BOUND`]'s closed range
//! `[-1, 1]`; the length always equals the kind's dimension.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Absolute bound on every vector component.
pub const VALUE_BOUND: f64 = 1.0;

/// Which encoder produced a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    /// Field terrain signature (32 dims).
    Terrain,
    /// Smoke dispersion signature (64 dims).
    Smoke,
    /// Weather embedding (128 dims).
    Weather,
}

impl VectorKind {
    /// Declared dimension.
    pub const fn dimension(&self) -> usize {
        match self {
            Self::Terrain => 32,
            Self::Smoke => 64,
            Self::Weather => 128,
        }
    }
}

/// A fixed-length encoded vector owned by a request, location, or reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Producing encoder.
    pub kind: VectorKind,
    /// Owning entity id.
    pub owner: String,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wraps raw values, checking length, finiteness, and bounds.
    pub fn new(kind: VectorKind, owner: impl Into<String>, values: Vec<f64>) -> EngineResult<Self> {
        if values.len() != kind.dimension() {
            return Err(EngineError::InvalidVector(format!(
                "{kind:?} vector needs {} values, got {}",
                kind.dimension(),
                values.len()
            )));
        }
        if let Some(pos) = values
            .iter()
            .position(|v| !v.is_finite() || v.abs() > VALUE_BOUND)
        {
            return Err(EngineError::InvalidVector(format!(
                "component {pos} is {} (must be finite and within ±{VALUE_BOUND})",
                values[pos]
            )));
        }
        Ok(Self {
            kind,
            owner: owner.into(),
            values,
        })
    }

    /// Component values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Vector length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed vector; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
