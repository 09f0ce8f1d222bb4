//! Smoke signature encoder (64 dims).
//!
//! Two burns whose signatures point the same way, carry the same distance,
//! and spread alike will put smoke over the same receptors. Cosine
//! similarity between signatures is the conflict detector's input.
//!
//! | Dims | Content |
//! |------|---------|
//! | 0..8 | plume heading harmonics, k = 1..4 |
//! | 8..24 | wind speed RBF over 0–30 mph |
//! | 24..40 | burn size RBF over ln(1 + ha) in 0–8 |
//! | 40..56 | relative downwind concentration at 0.5–8 km |
//! | 56..64 | relative crosswind concentration at 0–1.75 km |

use std::f64::consts::PI;

use super::{bound, fill_harmonics, fill_rbf, sanitize, squash};
use crate::models::WeatherReading;

/// Encodes a burn's smoke footprint under the given weather.
///
/// `request_id` tags trace output only; two requests with identical
/// attributes get identical signatures.
pub fn smoke_vector(request_id: &str, weather: &WeatherReading, area_hectares: f64) -> [f64; 64] {
    let neutral = WeatherReading::neutral();
    let wind_mph = sanitize(Some(weather.wind_speed), neutral.wind_speed).clamp(0.0, 200.0);
    let wind_from = sanitize(Some(weather.wind_direction), neutral.wind_direction);
    let area = sanitize(Some(area_hectares), 20.0).max(0.0);
    tracing::trace!(request_id, wind_mph, wind_from, area, "encoding smoke signature");

    let mut v = [0.0; 64];

    // Smoke travels away from where the wind blows from
    let heading = (wind_from + 180.0).rem_euclid(360.0) * PI / 180.0;
    fill_harmonics(&mut v[0..8], heading);

    fill_rbf(&mut v[8..24], wind_mph, 0.0, 30.0);

    let size = area.ln_1p();
    fill_rbf(&mut v[24..40], size, 0.0, 8.0);

    // Larger burns emit more; stronger wind carries smoke farther before it thins
    let strength = squash(size, 4.0);
    let carry_km = 1.0 + 0.2 * wind_mph;
    for (k, slot) in v[40..56].iter_mut().enumerate() {
        let distance_km = 0.5 * (k + 1) as f64;
        *slot = strength * (-distance_km / carry_km).exp();
    }

    // Stronger wind narrows the plume
    let spread_km = 0.5 + 2.0 / (1.0 + wind_mph / 5.0);
    for (k, slot) in v[56..64].iter_mut().enumerate() {
        let offset_km = 0.25 * k as f64;
        let z = offset_km / spread_km;
        *slot = strength * (-0.5 * z * z).exp();
    }

    bound(&mut v);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::similarity;

    #[test]
    fn test_smoke_length_and_bounds() {
        let v = smoke_vector("R1", &WeatherReading::new(12.0, 270.0, 30.0, 85.0), 150.0);
        assert_eq!(v.len(), 64);
        assert!(v.iter().all(|x| x.is_finite() && x.abs() <= 1.0));
    }

    #[test]
    fn test_smoke_ignores_request_id() {
        let w = WeatherReading::neutral();
        assert_eq!(smoke_vector("R1", &w, 40.0), smoke_vector("R2", &w, 40.0));
    }

    #[test]
    fn test_smoke_near_duplicate_similarity() {
        let w = WeatherReading::new(6.0, 200.0, 40.0, 75.0);
        let a = smoke_vector("R1", &w, 80.0);
        let b = smoke_vector("R2", &w, 80.0);
        assert!(similarity(&a, &b).unwrap() > 0.999);
    }

    #[test]
    fn test_smoke_opposite_wind_less_similar() {
        let a = smoke_vector("R1", &WeatherReading::new(6.0, 0.0, 40.0, 75.0), 80.0);
        let same = smoke_vector("R2", &WeatherReading::new(6.0, 10.0, 40.0, 75.0), 80.0);
        let opposite = smoke_vector("R3", &WeatherReading::new(6.0, 180.0, 40.0, 75.0), 80.0);
        assert!(similarity(&a, &same).unwrap() > similarity(&a, &opposite).unwrap());
    }

    #[test]
    fn test_smoke_sanitizes_weather() {
        let w = WeatherReading::new(f64::NAN, f64::INFINITY, 40.0, 75.0);
        let v = smoke_vector("R1", &w, f64::NAN);
        assert!(v.iter().all(|x| x.is_finite()));
    }
}
