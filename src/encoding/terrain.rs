//! Terrain encoder (32 dims).
//!
//! | Dims | Content |
//! |------|---------|
//! | 0..8 | elevation: squash + 7 RBF over 0–3000 m |
//! | 8..16 | slope: squash + 7 RBF over 0–30° |
//! | 16..24 | fuel load, vegetation density, area, fuel × cover, 4 fuel RBF |
//! | 24..32 | location: coarse and fine lat/lon harmonics |

use super::{bound, fill_rbf, sanitize, squash};
use crate::models::{Coordinate, TerrainAttributes};

const NEUTRAL_ELEVATION_M: f64 = 200.0;
const NEUTRAL_SLOPE_DEG: f64 = 2.0;
const NEUTRAL_FUEL_T_HA: f64 = 10.0;
const NEUTRAL_VEGETATION: f64 = 0.5;
const NEUTRAL_AREA_HA: f64 = 20.0;

/// Encodes field terrain into 32 bounded components.
///
/// `location` is usually the field centroid; `None` encodes the null island
/// neutral position so the remaining blocks still carry signal.
pub fn terrain_vector(
    attrs: &TerrainAttributes,
    area_hectares: f64,
    location: Option<Coordinate>,
) -> [f64; 32] {
    let mut v = [0.0; 32];

    let elevation = sanitize(attrs.elevation_m, NEUTRAL_ELEVATION_M);
    v[0] = squash(elevation, 1_500.0);
    fill_rbf(&mut v[1..8], elevation, 0.0, 3_000.0);

    let slope = sanitize(attrs.slope_deg, NEUTRAL_SLOPE_DEG).clamp(0.0, 90.0);
    v[8] = squash(slope, 15.0);
    fill_rbf(&mut v[9..16], slope, 0.0, 30.0);

    let fuel = sanitize(attrs.fuel_load_tons_per_ha, NEUTRAL_FUEL_T_HA).max(0.0);
    let cover = sanitize(attrs.vegetation_density, NEUTRAL_VEGETATION).clamp(0.0, 1.0);
    let area = sanitize(Some(area_hectares), NEUTRAL_AREA_HA).max(0.0);
    v[16] = squash(fuel, 15.0);
    v[17] = 2.0 * cover - 1.0;
    v[18] = squash(area.ln_1p(), 5.0);
    v[19] = squash(fuel * cover, 10.0);
    fill_rbf(&mut v[20..24], fuel, 0.0, 40.0);

    let (lon, lat) = location
        .filter(Coordinate::is_in_range)
        .map_or((0.0, 0.0), |c| (c.lon, c.lat));
    let (phi, lambda) = (lat.to_radians(), lon.to_radians());
    v[24] = phi.sin();
    v[25] = phi.cos();
    v[26] = lambda.sin();
    v[27] = lambda.cos();
    // Fine-grained terms separate fields a few kilometres apart
    v[28] = (8.0 * phi).sin();
    v[29] = (8.0 * phi).cos();
    v[30] = (8.0 * lambda).sin();
    v[31] = (8.0 * lambda).cos();

    bound(&mut v);
    v
}
