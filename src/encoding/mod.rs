//! Feature encoding: raw request, terrain, and weather attributes to
//! fixed-length vectors.
//!
//! Three pure encoders share one set of basis functions:
//!
//! | Encoder | Dims | Inputs |
//! |---------|------|--------|
//! | [`terrain_vector`] | 32 | elevation, slope, fuel/vegetation, area, location |
//! | [`smoke_vector`] | 64 | wind speed/direction, burn area |
//! | [`weather_embedding`] | 128 | temperature, humidity, wind, timestamp |
//!
//! # Guarantees
//!
//! - Same input ⇒ bit-identical output; no hidden state.
//! - Missing or non-finite inputs are replaced by neutral values, never propagated.
//! - Every component lies in `[-1, 1]` regardless of input magnitude.
//!
//! # Basis
//!
//! Scalars are expanded with Gaussian radial basis functions over a fixed
//! range (nearby values ⇒ overlapping activations ⇒ high cosine similarity)
//! plus a `tanh` squash of the raw value. Angles and times of day/year use
//! Fourier harmonics so that 359° and 1° encode close together.

mod smoke;
mod terrain;
mod weather;

pub use smoke::smoke_vector;
pub use terrain::terrain_vector;
pub use weather::weather_embedding;

use crate::error::EngineResult;
use crate::models::{BurnRequest, FeatureVector, VectorKind, WeatherReading, VALUE_BOUND};

/// Encodes a request's field terrain as a tagged vector.
pub fn terrain_feature(request: &BurnRequest) -> EngineResult<FeatureVector> {
    let values = terrain_vector(&request.terrain, request.area_hectares, request.location());
    FeatureVector::new(VectorKind::Terrain, request.id.clone(), values.to_vec())
}

/// Encodes a request's smoke signature under the given weather.
pub fn smoke_feature(request: &BurnRequest, weather: &WeatherReading) -> EngineResult<FeatureVector> {
    let values = smoke_vector(&request.id, weather, request.area_hectares);
    FeatureVector::new(VectorKind::Smoke, request.id.clone(), values.to_vec())
}

/// Encodes a weather reading as a tagged vector owned by `owner`.
pub fn weather_feature(owner: impl Into<String>, reading: &WeatherReading) -> EngineResult<FeatureVector> {
    FeatureVector::new(VectorKind::Weather, owner, weather_embedding(reading).to_vec())
}

/// Finite value or the neutral default.
pub(crate) fn sanitize(value: Option<f64>, neutral: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => neutral,
    }
}

/// Maps any real into (-1, 1); `scale` is where the curve reaches ~0.76.
pub(crate) fn squash(x: f64, scale: f64) -> f64 {
    (x / scale).tanh()
}

/// Fills `out` with Gaussian bumps centred evenly over `[lo, hi]`.
///
/// Width equals the centre spacing, so neighbouring bumps overlap.
pub(crate) fn fill_rbf(out: &mut [f64], x: f64, lo: f64, hi: f64) {
    let n = out.len();
    if n == 0 {
        return;
    }
    let spacing = if n > 1 { (hi - lo) / (n - 1) as f64 } else { hi - lo };
    let width = spacing.max(f64::EPSILON);
    let x = x.clamp(lo - 2.0 * width, hi + 2.0 * width);
    for (k, slot) in out.iter_mut().enumerate() {
        let center = lo + spacing * k as f64;
        let z = (x - center) / width;
        *slot = (-0.5 * z * z).exp();
    }
}

/// Fills `out` with interleaved `cos(kθ), sin(kθ)` for `k = 1..=out.len()/2`.
pub(crate) fn fill_harmonics(out: &mut [f64], theta: f64) {
    for (i, pair) in out.chunks_mut(2).enumerate() {
        let k = (i + 1) as f64;
        pair[0] = (k * theta).cos();
        if let Some(s) = pair.get_mut(1) {
            *s = (k * theta).sin();
        }
    }
}

/// Enforces the value bound on a finished vector.
pub(crate) fn bound(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = if v.is_finite() {
            v.clamp(-VALUE_BOUND, VALUE_BOUND)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Polygon, TerrainAttributes};

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(Some(3.0), 1.0), 3.0);
        assert_eq!(sanitize(Some(f64::NAN), 1.0), 1.0);
        assert_eq!(sanitize(Some(f64::INFINITY), 1.0), 1.0);
        assert_eq!(sanitize(None, 1.0), 1.0);
    }

    #[test]
    fn test_rbf_peaks_at_center() {
        let mut out = [0.0; 5];
        fill_rbf(&mut out, 50.0, 0.0, 100.0);
        assert!((out[2] - 1.0).abs() < 1e-12);
        assert!(out[0] < out[1] && out[1] < out[2]);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_harmonics_wrap_around() {
        let mut a = [0.0; 8];
        let mut b = [0.0; 8];
        fill_harmonics(&mut a, 0.0);
        fill_harmonics(&mut b, std::f64::consts::TAU);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bound_clamps_and_zeroes() {
        let mut v = [2.0, -3.0, f64::NAN, 0.5];
        bound(&mut v);
        assert_eq!(v, [1.0, -1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_tagged_features() {
        let req = BurnRequest::new("R1")
            .with_area(25.0)
            .with_terrain(TerrainAttributes {
                elevation_m: Some(120.0),
                slope_deg: Some(4.0),
                fuel_load_tons_per_ha: Some(8.0),
                vegetation_density: Some(0.6),
            })
            .with_geometry(Polygon::from_lon_lat(&[
                (-121.7, 38.5),
                (-121.7, 38.6),
                (-121.6, 38.6),
                (-121.7, 38.5),
            ]));

        let terrain = terrain_feature(&req).unwrap();
        assert_eq!(terrain.kind, VectorKind::Terrain);
        assert_eq!(terrain.len(), 32);

        let smoke = smoke_feature(&req, &WeatherReading::neutral()).unwrap();
        assert_eq!(smoke.len(), 64);
        assert_eq!(smoke.owner, "R1");

        let weather = weather_feature("2025-08-25", &WeatherReading::neutral()).unwrap();
        assert_eq!(weather.len(), 128);
    }
}
