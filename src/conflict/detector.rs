//! Pairwise conflict detection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::exposure::{cumulative_exposure, ActiveBurn};
use super::similarity::similarity;
use crate::encoding::smoke_vector;
use crate::error::EngineResult;
use crate::models::{BurnRequest, Conflict, FeatureVector, Severity, WeatherForecast, WeatherReading};

/// PM2.5 level (µg/m³) at which air turns unhealthy for sensitive groups.
const SENSITIVE_LIMIT_PM25: f64 = 35.5;

/// Conflict detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Minimum cosine similarity for a pair to conflict.
    pub threshold: f64,
    /// Fields farther apart than this (km) are never compared.
    pub search_radius_km: f64,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            search_radius_km: 10.0,
        }
    }
}

/// Tests two vectors for a conflict.
///
/// The vectors' owners form the pair. The combined level is a
/// similarity-scaled proxy, `2 × 35.5 × similarity`.
///
/// # Errors
/// [`crate::EngineError::DimensionMismatch`] for vectors of different kinds.
pub fn detect_conflict(
    a: &FeatureVector,
    b: &FeatureVector,
    threshold: f64,
) -> EngineResult<Option<Conflict>> {
    let s = similarity(a.values(), b.values())?;
    if s < threshold {
        return Ok(None);
    }
    let level = 2.0 * SENSITIVE_LIMIT_PM25 * s;
    Ok(Some(
        Conflict::new(&a.owner, &b.owner, Severity::from_similarity(s), level).with_similarity(s),
    ))
}

/// Batch detector over a request set.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    config: ConflictConfig,
}

impl ConflictDetector {
    /// Creates a detector.
    pub fn new(config: ConflictConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ConflictConfig {
        &self.config
    }

    /// [`detect_conflict`] with the configured threshold.
    pub fn detect(&self, a: &FeatureVector, b: &FeatureVector) -> EngineResult<Option<Conflict>> {
        detect_conflict(a, b, self.config.threshold)
    }

    /// Compares every pair of requests' smoke signatures.
    ///
    /// Each request is encoded under the forecast for its requested date.
    /// Pairs whose fields lie beyond the search radius are skipped; pairs
    /// lacking geometry are always compared. When both fields are located,
    /// the combined level comes from the plume model at their midpoint.
    pub fn detect_requests(
        &self,
        requests: &[BurnRequest],
        forecast: &WeatherForecast,
    ) -> Vec<Conflict> {
        let encoded: Vec<([f64; 64], WeatherReading)> = requests
            .iter()
            .map(|r| {
                let weather = r
                    .requested_date
                    .map_or_else(WeatherReading::neutral, |d| forecast.reading_or_neutral(d));
                (smoke_vector(&r.id, &weather, r.area_hectares), weather)
            })
            .collect();

        let mut conflicts = Vec::new();
        let mut compared = 0usize;
        for i in 0..requests.len() {
            for j in (i + 1)..requests.len() {
                let (a, b) = (&requests[i], &requests[j]);
                if a.id == b.id || !self.within_radius(a, b) {
                    continue;
                }
                compared += 1;

                // Same-length arrays cannot mismatch
                let s = similarity(&encoded[i].0, &encoded[j].0).unwrap_or(0.0);
                if s < self.config.threshold {
                    continue;
                }
                let level = plume_level(a, encoded[i].1, b, encoded[j].1)
                    .unwrap_or(2.0 * SENSITIVE_LIMIT_PM25 * s);
                let conflict = Conflict::new(&a.id, &b.id, Severity::from_similarity(s), level)
                    .with_similarity(s);
                debug!(
                    a = %conflict.request_a,
                    b = %conflict.request_b,
                    severity = %conflict.severity,
                    similarity = s,
                    pm25 = level,
                    "conflict detected"
                );
                conflicts.push(conflict);
            }
        }

        info!(
            requests = requests.len(),
            compared,
            conflicts = conflicts.len(),
            "conflict detection complete"
        );
        conflicts
    }

    fn within_radius(&self, a: &BurnRequest, b: &BurnRequest) -> bool {
        match (a.location(), b.location()) {
            (Some(pa), Some(pb)) => pa.haversine_km(&pb) <= self.config.search_radius_km,
            _ => true,
        }
    }
}

fn plume_level(
    a: &BurnRequest,
    weather_a: WeatherReading,
    b: &BurnRequest,
    weather_b: WeatherReading,
) -> Option<f64> {
    let burn_a = ActiveBurn::from_request(a, weather_a)?;
    let burn_b = ActiveBurn::from_request(b, weather_b)?;
    let receptor = burn_a.location.midpoint(&burn_b.location);
    Some(cumulative_exposure(&[burn_a, burn_b], receptor).level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Polygon, VectorKind};
    use chrono::NaiveDate;

    fn square(lon: f64, lat: f64) -> Polygon {
        let d = 0.005;
        Polygon::from_lon_lat(&[
            (lon, lat),
            (lon + d, lat),
            (lon + d, lat + d),
            (lon, lat + d),
            (lon, lat),
        ])
    }

    fn request(id: &str, lon: f64, lat: f64, area: f64) -> BurnRequest {
        BurnRequest::new(id)
            .with_area(area)
            .with_geometry(square(lon, lat))
            .with_window(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(), "08:00", "12:00")
    }

    fn vector(owner: &str, values: Vec<f64>) -> FeatureVector {
        let mut padded = values;
        padded.resize(VectorKind::Terrain.dimension(), 0.0);
        FeatureVector::new(VectorKind::Terrain, owner, padded).unwrap()
    }

    #[test]
    fn test_detect_conflict_threshold() {
        let a = vector("R1", vec![1.0, 0.0]);
        let b = vector("R2", vec![1.0, 0.05]);
        let c = vector("R3", vec![0.0, 1.0]);

        let hit = detect_conflict(&a, &b, 0.85).unwrap().unwrap();
        assert_eq!(hit.severity, Severity::Critical);
        assert_eq!((hit.request_a.as_str(), hit.request_b.as_str()), ("R1", "R2"));
        assert!((hit.combined_pm25 - 71.0 * hit.similarity).abs() < 1e-9);

        assert!(detect_conflict(&a, &c, 0.85).unwrap().is_none());
    }

    #[test]
    fn test_detect_conflict_kind_mismatch() {
        let terrain = vector("R1", vec![1.0]);
        let smoke = FeatureVector::new(VectorKind::Smoke, "R2", vec![0.5; 64]).unwrap();
        assert!(detect_conflict(&terrain, &smoke, 0.85).is_err());
    }

    #[test]
    fn test_detect_requests_nearby_identical_burns() {
        let reqs = vec![
            request("R1", -121.70, 38.50, 40.0),
            request("R2", -121.69, 38.50, 40.0),
        ];
        let conflicts = ConflictDetector::default().detect_requests(&reqs, &WeatherForecast::new());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, Severity::Critical);
        assert!(conflicts[0].combined_pm25 >= 0.0);
    }

    #[test]
    fn test_detect_requests_respects_radius() {
        let reqs = vec![
            request("R1", -121.70, 38.50, 40.0),
            // Roughly 90 km away
            request("R2", -120.66, 38.50, 40.0),
        ];
        let conflicts = ConflictDetector::default().detect_requests(&reqs, &WeatherForecast::new());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_detect_requests_without_geometry_uses_proxy() {
        let reqs = vec![
            BurnRequest::new("R1").with_area(40.0),
            BurnRequest::new("R2").with_area(40.0),
        ];
        let conflicts = ConflictDetector::default().detect_requests(&reqs, &WeatherForecast::new());
        assert_eq!(conflicts.len(), 1);
        assert!((conflicts[0].combined_pm25 - 71.0).abs() < 1e-6);
    }
}
