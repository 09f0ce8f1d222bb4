//! Request priority scoring.
//!
//! A weighted sum of independent factors, each saturating at its weight:
//!
//! | Factor | Contribution | Missing |
//! |--------|--------------|---------|
//! | base | constant | - |
//! | purpose | per-purpose weight, wildfire prevention highest | `missing_purpose` |
//! | fuel load | `min(fuel / saturation, 1) × fuel_load` | half weight |
//! | area | `min(ln(1 + a) / ln(1 + saturation), 1) × area` | half weight |
//! | slope | `min(slope / saturation, 1) × slope` | half weight |
//! | success | `rate × success` | half weight |
//!
//! The total is clamped to `[0, 100]`. Higher means more urgent.

use serde::{Deserialize, Serialize};

use crate::models::{BurnPurpose, BurnRequest};

/// Tunable factor weights.
///
/// Defaults sum to 100 at saturation with the highest purpose weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// Constant floor every request receives.
    pub base: f64,
    /// Hazard fuel reduction.
    pub wildfire_prevention: f64,
    /// Diseased residue.
    pub disease_control: f64,
    /// Pest habitat removal.
    pub pest_control: f64,
    /// Habitat restoration.
    pub habitat_management: f64,
    /// Routine residue removal.
    pub residue_management: f64,
    /// Any other purpose.
    pub other_purpose: f64,
    /// Contribution when no purpose is given.
    pub missing_purpose: f64,
    /// Fuel load weight.
    pub fuel_load: f64,
    /// Fuel load (t/ha) at which the factor saturates.
    pub fuel_saturation_t_ha: f64,
    /// Area weight.
    pub area: f64,
    /// Area (ha) at which the factor saturates.
    pub area_saturation_ha: f64,
    /// Slope weight.
    pub slope: f64,
    /// Slope (°) at which the factor saturates.
    pub slope_saturation_deg: f64,
    /// Historical success weight.
    pub success: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            base: 10.0,
            wildfire_prevention: 30.0,
            disease_control: 22.0,
            pest_control: 18.0,
            habitat_management: 14.0,
            residue_management: 10.0,
            other_purpose: 8.0,
            missing_purpose: 10.0,
            fuel_load: 25.0,
            fuel_saturation_t_ha: 20.0,
            area: 15.0,
            area_saturation_ha: 1000.0,
            slope: 10.0,
            slope_saturation_deg: 30.0,
            success: 10.0,
        }
    }
}

/// Per-factor contributions behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    /// Constant every request receives.
    pub base: f64,
    /// Burn purpose weight.
    pub purpose: f64,
    /// Saturating fuel load term.
    pub fuel_load: f64,
    /// Log-saturating area term.
    pub area: f64,
    /// Slope risk term.
    pub slope: f64,
    /// Historical success term.
    pub success: f64,
}

impl PriorityBreakdown {
    /// Sum of contributions clamped to `[0, 100]`.
    pub fn total(&self) -> f64 {
        let sum = self.base + self.purpose + self.fuel_load + self.area + self.slope + self.success;
        if sum.is_finite() {
            sum.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Scores burn requests with a fixed set of weights.
///
/// # Example
/// ```
/// use u_burnsched::models::{BurnPurpose, BurnRequest};
/// use u_burnsched::priority::PriorityScorer;
///
/// let scorer = PriorityScorer::default();
/// let urgent = BurnRequest::new("R1").with_purpose(BurnPurpose::WildfirePrevention);
/// let routine = BurnRequest::new("R2").with_purpose(BurnPurpose::ResidueManagement);
/// assert!(scorer.score(&urgent) > scorer.score(&routine));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PriorityScorer {
    weights: PriorityWeights,
}

impl PriorityScorer {
    /// Creates a scorer.
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    /// Weights in use.
    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    /// Priority in `[0, 100]`.
    pub fn score(&self, request: &BurnRequest) -> f64 {
        self.breakdown(request).total()
    }

    /// Factor contributions.
    pub fn breakdown(&self, request: &BurnRequest) -> PriorityBreakdown {
        let w = &self.weights;
        PriorityBreakdown {
            base: w.base,
            purpose: self.purpose_weight(request.purpose),
            fuel_load: saturating(request.fuel_load(), w.fuel_load, |f| {
                f / w.fuel_saturation_t_ha
            }),
            area: saturating(Some(request.area_hectares), w.area, |a| {
                a.ln_1p() / w.area_saturation_ha.ln_1p()
            }),
            slope: saturating(request.terrain.slope_deg, w.slope, |s| {
                s / w.slope_saturation_deg
            }),
            success: saturating(request.historical_success_rate, w.success, |r| r),
        }
    }

    fn purpose_weight(&self, purpose: Option<BurnPurpose>) -> f64 {
        let w = &self.weights;
        match purpose {
            Some(BurnPurpose::WildfirePrevention) => w.wildfire_prevention,
            Some(BurnPurpose::DiseaseControl) => w.disease_control,
            Some(BurnPurpose::PestControl) => w.pest_control,
            Some(BurnPurpose::HabitatManagement) => w.habitat_management,
            Some(BurnPurpose::ResidueManagement) => w.residue_management,
            Some(BurnPurpose::Other) => w.other_purpose,
            None => w.missing_purpose,
        }
    }
}

/// `weight × clamp(ratio(value), 0, 1)`, or half the weight when the value
/// is missing, non-finite, or negative.
fn saturating(value: Option<f64>, weight: f64, ratio: impl Fn(f64) -> f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => {
            let r = ratio(v);
            if r.is_finite() {
                weight * r.clamp(0.0, 1.0)
            } else {
                weight * 0.5
            }
        }
        _ => weight * 0.5,
    }
}

/// Scores a request with default weights.
pub fn score(request: &BurnRequest) -> f64 {
    PriorityScorer::default().score(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainAttributes;

    fn full(purpose: BurnPurpose) -> BurnRequest {
        BurnRequest::new("R1")
            .with_purpose(purpose)
            .with_area(5000.0)
            .with_terrain(TerrainAttributes {
                slope_deg: Some(45.0),
                fuel_load_tons_per_ha: Some(40.0),
                ..Default::default()
            })
            .with_success_rate(1.0)
    }

    #[test]
    fn test_score_saturates_at_100() {
        assert!((score(&full(BurnPurpose::WildfirePrevention)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_factors_are_neutral() {
        let b = PriorityScorer::default().breakdown(&BurnRequest::new("R1"));
        assert_eq!(b.base, 10.0);
        assert_eq!(b.purpose, 10.0);
        assert_eq!(b.fuel_load, 12.5);
        // Zero area is present, not missing
        assert_eq!(b.area, 0.0);
        assert_eq!(b.slope, 5.0);
        assert_eq!(b.success, 5.0);
        assert!((b.total() - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_purpose_ordering() {
        let s = |p| score(&BurnRequest::new("R1").with_purpose(p));
        assert!(s(BurnPurpose::WildfirePrevention) > s(BurnPurpose::DiseaseControl));
        assert!(s(BurnPurpose::DiseaseControl) > s(BurnPurpose::PestControl));
        assert!(s(BurnPurpose::ResidueManagement) > s(BurnPurpose::Other));
    }

    #[test]
    fn test_fuel_load_non_decreasing() {
        let mut prev = f64::MIN;
        for fuel in [0.0, 2.0, 5.0, 10.0, 20.0, 50.0, 1e6] {
            let s = score(&BurnRequest::new("R1").with_fuel_load(fuel));
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_bounds_for_hostile_inputs() {
        let req = BurnRequest::new("R1")
            .with_area(f64::INFINITY)
            .with_fuel_load(f64::NAN)
            .with_success_rate(-4.0);
        let s = score(&req);
        assert!((0.0..=100.0).contains(&s));

        let heavy = PriorityScorer::new(PriorityWeights {
            base: 500.0,
            ..Default::default()
        });
        assert_eq!(heavy.score(&req), 100.0);
    }
}
