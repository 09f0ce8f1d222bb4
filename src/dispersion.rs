//! Gaussian plume dispersion.
//!
//! Ground-level PM2.5 from a continuous point source, using Pasquill–Gifford
//! stability classes for plume spread.
//!
//! # Reference
//! Turner, D.B. (1994). *Workbook of Atmospheric Dispersion Estimates*, 2nd ed.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::FuelType;

/// Fraction of fuel load actually consumed by a prescribed burn.
pub const COMBUSTION_COMPLETENESS: f64 = 0.7;

/// Pasquill–Gifford atmospheric stability class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StabilityClass {
    /// Very unstable.
    A,
    /// Moderately unstable.
    B,
    /// Slightly unstable.
    C,
    /// Neutral.
    D,
    /// Slightly stable.
    E,
    /// Moderately stable.
    F,
}

impl StabilityClass {
    /// All classes, most to least unstable.
    pub const ALL: [StabilityClass; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// Simplified Turner estimate from surface wind and time of day.
    pub fn estimate(wind_m_s: f64, daytime: bool) -> Self {
        match (daytime, wind_m_s) {
            (true, u) if u < 2.0 => Self::A,
            (true, u) if u < 3.0 => Self::B,
            (true, u) if u < 5.0 => Self::C,
            (false, u) if u < 3.0 => Self::F,
            (false, u) if u < 5.0 => Self::E,
            _ => Self::D,
        }
    }

    /// Position in [`Self::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    fn coefficients(self) -> Coefficients {
        let (a, c, d, f, g) = match self {
            Self::A => (213.0, 440.8, 1.041, 9.27, 0.459),
            Self::B => (156.0, 106.6, 1.149, 3.3, 0.382),
            Self::C => (104.0, 61.0, 0.911, 0.0, 0.0),
            Self::D => (68.0, 33.2, 0.725, -1.7, -0.031),
            Self::E => (50.5, 22.8, 0.678, -1.3, -0.031),
            Self::F => (34.0, 14.35, 0.740, -0.35, -0.048),
        };
        Coefficients { a, b: 0.894, c, d, f, g }
    }
}

struct Coefficients {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    f: f64,
    g: f64,
}

/// Lateral and vertical spread `(σy, σz)` in metres at downwind distance `x_m`.
///
/// Returns `(0, 0)` at or behind the source.
pub fn dispersion_coefficients(x_m: f64, class: StabilityClass) -> (f64, f64) {
    if !(x_m > 0.0) {
        return (0.0, 0.0);
    }
    let x_km = x_m / 1000.0;
    let k = class.coefficients();
    let sigma_y = k.a * x_km.powf(k.b);
    let base = k.c * x_km.powf(k.d);
    let correction = 1.0 + k.f * x_km;
    // The correction term is only fitted where it stays positive
    let sigma_z = match class {
        StabilityClass::E | StabilityClass::F => base,
        _ if correction > 0.0 => base * correction.powf(k.g),
        _ => base,
    };
    (sigma_y, sigma_z)
}

/// Concentration (µg/m³) at `(x, y, z)` metres from a source of strength
/// `q_g_s` (g/s) released at effective height `h_m`.
///
/// `x` is downwind distance, `y` crosswind offset, `z` receptor height.
/// Includes ground reflection. Zero upwind of the source.
pub fn gaussian_plume(
    q_g_s: f64,
    u_m_s: f64,
    h_m: f64,
    x: f64,
    y: f64,
    z: f64,
    class: StabilityClass,
) -> f64 {
    if !(x > 0.0) || !(u_m_s > 0.0) || !(q_g_s > 0.0) {
        return 0.0;
    }
    let (sy, sz) = dispersion_coefficients(x, class);
    if sy <= 0.0 || sz <= 0.0 {
        return 0.0;
    }

    let lateral = (-0.5 * (y / sy).powi(2)).exp();
    let vertical = (-0.5 * ((z - h_m) / sz).powi(2)).exp() + (-0.5 * ((z + h_m) / sz).powi(2)).exp();
    let c = q_g_s / (2.0 * PI * u_m_s * sy * sz) * lateral * vertical;

    // g/m³ to µg/m³
    let ug = c * 1e6;
    if ug.is_finite() {
        ug
    } else {
        0.0
    }
}

/// PM2.5 emission rate (g/s) for a burn spread evenly over `duration_h`.
pub fn emission_rate_g_s(
    area_ha: f64,
    fuel_load_t_ha: f64,
    fuel_type: FuelType,
    duration_h: f64,
) -> f64 {
    if !(area_ha > 0.0) || !(fuel_load_t_ha > 0.0) || !(duration_h > 0.0) {
        return 0.0;
    }
    let consumed_kg = area_ha * fuel_load_t_ha * 1000.0 * COMBUSTION_COMPLETENESS;
    let pm25_g = consumed_kg * fuel_type.pm25_emission_factor();
    pm25_g / (duration_h * 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_stability() {
        assert_eq!(StabilityClass::estimate(1.0, true), StabilityClass::A);
        assert_eq!(StabilityClass::estimate(2.5, true), StabilityClass::B);
        assert_eq!(StabilityClass::estimate(4.0, true), StabilityClass::C);
        assert_eq!(StabilityClass::estimate(8.0, true), StabilityClass::D);
        assert_eq!(StabilityClass::estimate(1.0, false), StabilityClass::F);
        assert_eq!(StabilityClass::estimate(4.0, false), StabilityClass::E);
        assert_eq!(StabilityClass::estimate(8.0, false), StabilityClass::D);
    }

    #[test]
    fn test_coefficients_grow_with_distance() {
        for class in StabilityClass::ALL {
            let (y1, z1) = dispersion_coefficients(500.0, class);
            let (y2, z2) = dispersion_coefficients(2_000.0, class);
            assert!(y2 > y1, "{class:?} sigma_y");
            assert!(z2 > z1, "{class:?} sigma_z");
        }
        assert_eq!(dispersion_coefficients(0.0, StabilityClass::D), (0.0, 0.0));
    }

    #[test]
    fn test_unstable_spreads_wider() {
        let (ya, _) = dispersion_coefficients(1_000.0, StabilityClass::A);
        let (yf, _) = dispersion_coefficients(1_000.0, StabilityClass::F);
        assert!(ya > yf);
    }

    #[test]
    fn test_plume_zero_upwind() {
        assert_eq!(gaussian_plume(100.0, 3.0, 10.0, -500.0, 0.0, 0.0, StabilityClass::D), 0.0);
        assert_eq!(gaussian_plume(100.0, 3.0, 10.0, 0.0, 0.0, 0.0, StabilityClass::D), 0.0);
    }

    #[test]
    fn test_plume_decays_downwind() {
        let near = gaussian_plume(100.0, 3.0, 10.0, 1_000.0, 0.0, 0.0, StabilityClass::D);
        let far = gaussian_plume(100.0, 3.0, 10.0, 5_000.0, 0.0, 0.0, StabilityClass::D);
        assert!(near > 0.0);
        assert!(near > far);
    }

    #[test]
    fn test_plume_centerline_highest() {
        let center = gaussian_plume(100.0, 3.0, 10.0, 2_000.0, 0.0, 0.0, StabilityClass::C);
        let off = gaussian_plume(100.0, 3.0, 10.0, 2_000.0, 300.0, 0.0, StabilityClass::C);
        assert!(center > off);
    }

    #[test]
    fn test_emission_rate() {
        // 10 ha × 10 t/ha × 1000 × 0.7 = 70 000 kg; × 6.3 g/kg over 4 h
        let q = emission_rate_g_s(10.0, 10.0, FuelType::CropResidue, 4.0);
        assert!((q - 70_000.0 * 6.3 / 14_400.0).abs() < 1e-9);
        assert_eq!(emission_rate_g_s(0.0, 10.0, FuelType::Grass, 4.0), 0.0);
    }
}
