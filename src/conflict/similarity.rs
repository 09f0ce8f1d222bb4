//! Vector similarity measures.

use crate::error::{EngineError, EngineResult};

/// Cosine similarity in `[-1, 1]`.
///
/// Symmetric. Returns `0.0` when either vector has zero norm.
///
/// # Errors
/// [`EngineError::DimensionMismatch`] when the lengths differ.
///
/// # Example
/// ```
/// use u_burnsched::conflict::similarity;
///
/// let s = similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
/// assert!((s - 1.0).abs() < 1e-12);
/// ```
pub fn similarity(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    check_dimensions(a, b)?;

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return Ok(0.0);
    }

    let s = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(if s.is_finite() { s.clamp(-1.0, 1.0) } else { 0.0 })
}

/// Cosine distance, `1 - similarity`, in `[0, 2]`.
///
/// Not a true metric: the triangle inequality holds only approximately.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    Ok(1.0 - similarity(a, b)?)
}

/// Euclidean distance.
pub fn l2_distance(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    check_dimensions(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

fn check_dimensions(a: &[f64], b: &[f64]) -> EngineResult<()> {
    if a.len() != b.len() {
        return Err(EngineError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}
