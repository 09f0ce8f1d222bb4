//! Weather embedding (128 dims).
//!
//! | Dims | Content |
//! |------|---------|
//! | 0..16 | temperature RBF over 0–120 °F |
//! | 16..32 | relative humidity RBF over 0–100 % |
//! | 32..48 | wind speed RBF over 0–30 mph |
//! | 48..64 | wind direction harmonics, k = 1..8 |
//! | 64..80 | time-of-day harmonics (zero without a timestamp) |
//! | 80..96 | day-of-year harmonics (zero without a timestamp) |
//! | 96..112 | fire-weather terms and an 8-centre danger RBF |
//! | 112..128 | stability class one-hot, 10-centre dispersion RBF |

use std::f64::consts::{PI, TAU};

use chrono::{Datelike, Timelike};

use super::{bound, fill_harmonics, fill_rbf, sanitize, squash};
use crate::dispersion::StabilityClass;
use crate::models::WeatherReading;

/// Encodes a weather reading as a 128-dimension embedding in `[-1, 1]`.
pub fn weather_embedding(reading: &WeatherReading) -> [f64; 128] {
    let neutral = WeatherReading::neutral();
    let temp = sanitize(Some(reading.temperature), neutral.temperature);
    let humidity = sanitize(Some(reading.humidity), neutral.humidity).clamp(0.0, 100.0);
    let wind = sanitize(Some(reading.wind_speed), neutral.wind_speed).clamp(0.0, 200.0);
    let direction = sanitize(Some(reading.wind_direction), neutral.wind_direction);

    let mut v = [0.0; 128];

    fill_rbf(&mut v[0..16], temp, 0.0, 120.0);
    fill_rbf(&mut v[16..32], humidity, 0.0, 100.0);
    fill_rbf(&mut v[32..48], wind, 0.0, 30.0);
    fill_harmonics(&mut v[48..64], direction.rem_euclid(360.0) * PI / 180.0);

    let mut daytime = true;
    if let Some(at) = reading.observed_at {
        let seconds = at.num_seconds_from_midnight() as f64;
        fill_harmonics(&mut v[64..80], TAU * seconds / 86_400.0);
        let day = at.ordinal0() as f64;
        fill_harmonics(&mut v[80..96], TAU * day / 365.25);
        daytime = (6..18).contains(&at.hour());
    }

    let dryness = 1.0 - humidity / 100.0;
    let windiness = squash(wind, 10.0);
    let heat = squash((temp - 60.0).max(0.0), 30.0);
    v[96] = 2.0 * dryness - 1.0;
    v[97] = windiness;
    v[98] = heat;
    v[99] = dryness * windiness;
    v[100] = dryness * heat;
    v[101] = windiness * heat;
    // Spread-risk flags mirroring the scheduler's weather penalties
    v[102] = if wind > 8.0 { 1.0 } else { 0.0 };
    v[103] = if humidity < 30.0 { 1.0 } else { 0.0 };
    let danger = (dryness + windiness + heat) / 3.0;
    fill_rbf(&mut v[104..112], danger, 0.0, 1.0);

    let wind_m_s = reading.wind_speed_m_s();
    let class = StabilityClass::estimate(wind_m_s, daytime);
    v[112 + class.index()] = 1.0;
    // Unstable air and wind both dilute smoke faster
    let mixing = 1.0 - class.index() as f64 / 5.0;
    let potential = 0.5 * squash(wind_m_s, 5.0) + 0.5 * mixing;
    fill_rbf(&mut v[118..128], potential, 0.0, 1.0);

    bound(&mut v);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::similarity;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_weather_embedding_length_and_bounds() {
        let v = weather_embedding(&WeatherReading::new(25.0, 300.0, 8.0, 110.0));
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|x| x.is_finite() && x.abs() <= 1.0));
    }

    #[test]
    fn test_weather_embedding_deterministic() {
        let at = Utc.with_ymd_and_hms(2025, 8, 25, 9, 30, 0).unwrap();
        let r = WeatherReading::new(7.0, 220.0, 45.0, 78.0).at(at);
        assert_eq!(weather_embedding(&r), weather_embedding(&r));
    }

    #[test]
    fn test_weather_time_blocks_zero_without_timestamp() {
        let v = weather_embedding(&WeatherReading::neutral());
        assert!(v[64..96].iter().all(|x| *x == 0.0));

        let at = Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap();
        let stamped = weather_embedding(&WeatherReading::neutral().at(at));
        assert!(stamped[64..96].iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_weather_similar_readings_score_high() {
        let a = weather_embedding(&WeatherReading::new(6.0, 180.0, 50.0, 72.0));
        let b = weather_embedding(&WeatherReading::new(6.5, 185.0, 52.0, 73.0));
        let c = weather_embedding(&WeatherReading::new(25.0, 0.0, 10.0, 105.0));
        let near = similarity(&a, &b).unwrap();
        let far = similarity(&a, &c).unwrap();
        assert!(near > 0.95);
        assert!(near > far);
    }

    #[test]
    fn test_weather_sanitizes_non_finite() {
        let r = WeatherReading::new(f64::NAN, f64::NEG_INFINITY, f64::NAN, f64::INFINITY);
        assert_eq!(weather_embedding(&r), weather_embedding(&WeatherReading::neutral()));
    }
}
