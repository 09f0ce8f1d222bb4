//! Cumulative smoke exposure at a receptor.
//!
//! Every simultaneous burn is treated as a ground-level point source at its
//! field centroid; contributions from each Gaussian plume are summed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dispersion::{emission_rate_g_s, gaussian_plume, StabilityClass};
use crate::models::{BurnRequest, Coordinate, WeatherReading};

/// Effective release height of an open field burn (m).
pub const RELEASE_HEIGHT_M: f64 = 2.0;

/// Receptors closer than this are evaluated at this downwind distance (m).
const NEAR_FIELD_M: f64 = 100.0;

const DEFAULT_FUEL_T_HA: f64 = 10.0;
const DEFAULT_DURATION_H: f64 = 4.0;

/// Air quality category for a PM2.5 level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardTier {
    /// Below 12.1 µg/m³.
    Good,
    /// Below 35.5 µg/m³.
    Moderate,
    /// Below 150.5 µg/m³.
    Unhealthy,
    /// Below 250.5 µg/m³.
    VeryUnhealthy,
    /// 250.5 µg/m³ or more.
    Hazardous,
}

impl HazardTier {
    /// Tier for a PM2.5 concentration (µg/m³).
    pub fn from_level(level: f64) -> Self {
        if level < 12.1 {
            Self::Good
        } else if level < 35.5 {
            Self::Moderate
        } else if level < 150.5 {
            Self::Unhealthy
        } else if level < 250.5 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }
}

impl fmt::Display for HazardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        };
        f.write_str(name)
    }
}

/// A burn in progress, reduced to what the plume model needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBurn {
    /// Burn request id.
    pub request_id: String,
    /// Source position.
    pub location: Coordinate,
    /// PM2.5 emission rate (g/s).
    pub emission_rate_g_s: f64,
    /// Conditions during the burn.
    pub weather: WeatherReading,
}

impl ActiveBurn {
    /// Creates an active burn.
    pub fn new(
        request_id: impl Into<String>,
        location: Coordinate,
        emission_rate_g_s: f64,
        weather: WeatherReading,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            location,
            emission_rate_g_s,
            weather,
        }
    }

    /// Derives the source from a request; `None` without field geometry.
    ///
    /// Missing fuel load or burn window fall back to 10 t/ha over 4 h.
    pub fn from_request(request: &BurnRequest, weather: WeatherReading) -> Option<Self> {
        let location = request.location()?;
        let fuel = request
            .fuel_load()
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(DEFAULT_FUEL_T_HA);
        let duration = request
            .duration_hours()
            .filter(|h| *h > 0.0)
            .unwrap_or(DEFAULT_DURATION_H);
        let q = emission_rate_g_s(request.area_hectares, fuel, request.fuel_type, duration);
        Some(Self::new(request.id.clone(), location, q, weather))
    }

    /// Ground-level concentration (µg/m³) this burn produces at `point`.
    pub fn concentration_at(&self, point: &Coordinate) -> f64 {
        let distance_m = self.location.haversine_km(point) * 1000.0;
        let (x, y) = if distance_m < NEAR_FIELD_M {
            (NEAR_FIELD_M, 0.0)
        } else {
            // Smoke travels away from where the wind blows from
            let heading = (self.weather.wind_direction + 180.0).rem_euclid(360.0);
            let offset = (self.location.bearing_deg(point) - heading).to_radians();
            (distance_m * offset.cos(), distance_m * offset.sin())
        };

        let u = self.weather.wind_speed_m_s();
        // Burns run inside the 06:00-18:00 slot day
        let class = StabilityClass::estimate(u, true);
        gaussian_plume(self.emission_rate_g_s, u, RELEASE_HEIGHT_M, x, y, 0.0, class)
    }
}

/// Combined PM2.5 at a receptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureEstimate {
    /// Summed concentration (µg/m³).
    pub level: f64,
    /// Category for `level`.
    pub hazard: HazardTier,
    /// Burns contributing a non-zero concentration.
    pub contributing_burns: usize,
}

/// Sums every active burn's plume at `point`.
///
/// An empty burn set yields a zero, `Good` estimate.
pub fn cumulative_exposure(active_burns: &[ActiveBurn], point: Coordinate) -> ExposureEstimate {
    let mut level = 0.0;
    let mut contributing_burns = 0;
    for burn in active_burns {
        let c = burn.concentration_at(&point);
        if c > 0.0 {
            level += c;
            contributing_burns += 1;
        }
    }
    ExposureEstimate {
        level,
        hazard: HazardTier::from_level(level),
        contributing_burns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn(id: &str, lon: f64, lat: f64) -> ActiveBurn {
        // Wind from the west: plume heads east
        ActiveBurn::new(id, Coordinate::new(lon, lat), 50.0, WeatherReading::new(8.0, 270.0, 40.0, 75.0))
    }

    #[test]
    fn test_hazard_tiers() {
        assert_eq!(HazardTier::from_level(0.0), HazardTier::Good);
        assert_eq!(HazardTier::from_level(12.1), HazardTier::Moderate);
        assert_eq!(HazardTier::from_level(35.4), HazardTier::Moderate);
        assert_eq!(HazardTier::from_level(35.5), HazardTier::Unhealthy);
        assert_eq!(HazardTier::from_level(200.0), HazardTier::VeryUnhealthy);
        assert_eq!(HazardTier::from_level(250.5), HazardTier::Hazardous);
        assert_eq!(HazardTier::VeryUnhealthy.to_string(), "Very Unhealthy");
    }

    #[test]
    fn test_empty_burn_set() {
        let e = cumulative_exposure(&[], Coordinate::new(-121.7, 38.5));
        assert_eq!(e.level, 0.0);
        assert_eq!(e.hazard, HazardTier::Good);
        assert_eq!(e.contributing_burns, 0);
    }

    #[test]
    fn test_upwind_receptor_sees_nothing() {
        let b = burn("R1", -121.70, 38.50);
        let upwind = Coordinate::new(-121.75, 38.50);
        assert_eq!(b.concentration_at(&upwind), 0.0);
    }

    #[test]
    fn test_exposure_accumulates() {
        let receptor = Coordinate::new(-121.68, 38.50);
        let one = cumulative_exposure(&[burn("R1", -121.70, 38.50)], receptor);
        let two = cumulative_exposure(
            &[burn("R1", -121.70, 38.50), burn("R2", -121.70, 38.501)],
            receptor,
        );
        assert!(one.level > 0.0);
        assert!(two.level > one.level);
        assert_eq!(two.contributing_burns, 2);
    }

    #[test]
    fn test_from_request_requires_geometry() {
        let req = BurnRequest::new("R1").with_area(40.0);
        assert!(ActiveBurn::from_request(&req, WeatherReading::neutral()).is_none());
    }
}
