//! Field geometry in WGS84 degrees.
//!
//! Coordinates follow GeoJSON axis order: longitude first, latitude second.
//! A polygon is a single linear ring whose first and last points coincide.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (km) used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees, [-180, 180].
    pub lon: f64,
    /// Latitude in degrees, [-90, 90].
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether the position lies inside the WGS84 domain.
    pub fn is_in_range(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Great-circle distance to `other` (km).
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Initial bearing from `self` towards `other` (degrees clockwise from north, [0, 360)).
    pub fn bearing_deg(&self, other: &Coordinate) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        y.atan2(x).to_degrees().rem_euclid(360.0)
    }

    /// Midpoint of the straight line between two positions (planar approximation).
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// South-west corner.
    pub min: Coordinate,
    /// North-east corner.
    pub max: Coordinate,
}

impl BoundingBox {
    /// Whether two boxes share any area or edge.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.lon <= other.max.lon
            && other.min.lon <= self.max.lon
            && self.min.lat <= other.max.lat
            && other.min.lat <= self.max.lat
    }
}

/// A field boundary: one closed linear ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Ring vertices; a valid ring repeats its first point at the end.
    pub ring: Vec<Coordinate>,
}

impl Polygon {
    /// Creates a polygon from its ring.
    pub fn new(ring: Vec<Coordinate>) -> Self {
        Self { ring }
    }

    /// Creates a polygon from `(lon, lat)` pairs.
    pub fn from_lon_lat(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(lon, lat)| Coordinate::new(lon, lat)).collect())
    }

    /// Whether the ring ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => self.ring.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Vertices without the closing duplicate.
    pub fn vertices(&self) -> &[Coordinate] {
        if self.is_closed() {
            &self.ring[..self.ring.len() - 1]
        } else {
            &self.ring
        }
    }

    /// Whether any two non-adjacent edges of the ring cross or touch.
    ///
    /// # Algorithm
    /// Pairwise orientation test over all edge pairs, O(n²). Field boundaries
    /// have tens of vertices, so the quadratic scan is adequate.
    pub fn is_self_intersecting(&self) -> bool {
        let edge_count = self.ring.len().saturating_sub(1);
        if edge_count < 3 {
            return false;
        }

        for i in 0..edge_count {
            for j in (i + 1)..edge_count {
                let adjacent = j == i + 1 || (i == 0 && j == edge_count - 1);
                if adjacent {
                    continue;
                }
                if segments_intersect(
                    self.ring[i],
                    self.ring[i + 1],
                    self.ring[j],
                    self.ring[j + 1],
                ) {
                    return true;
                }
            }
        }
        false
    }

    /// Vertex average of the ring (closing point excluded).
    pub fn centroid(&self) -> Option<Coordinate> {
        let vertices = self.vertices();
        if vertices.is_empty() {
            return None;
        }
        let n = vertices.len() as f64;
        let lon = vertices.iter().map(|c| c.lon).sum::<f64>() / n;
        let lat = vertices.iter().map(|c| c.lat).sum::<f64>() / n;
        Some(Coordinate::new(lon, lat))
    }

    /// Bounding box of the ring.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.ring.first()?;
        let mut min = first;
        let mut max = first;
        for c in &self.ring[1..] {
            min.lon = min.lon.min(c.lon);
            min.lat = min.lat.min(c.lat);
            max.lon = max.lon.max(c.lon);
            max.lat = max.lat.max(c.lat);
        }
        Some(BoundingBox { min, max })
    }

    /// Point-in-polygon by ray casting. Points on the boundary may go either way.
    pub fn contains(&self, point: &Coordinate) -> bool {
        let vertices = self.vertices();
        let n = vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[j]);
            if (a.lat > point.lat) != (b.lat > point.lat) {
                let cross_lon = (b.lon - a.lon) * (point.lat - a.lat) / (b.lat - a.lat) + a.lon;
                if point.lon < cross_lon {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Whether two polygons share any area or boundary.
    pub fn intersects(&self, other: &Polygon) -> bool {
        match (self.bounding_box(), other.bounding_box()) {
            (Some(a), Some(b)) if a.intersects(&b) => {}
            _ => return false,
        }
        let crosses = self.ring.windows(2).any(|e| {
            other
                .ring
                .windows(2)
                .any(|f| segments_intersect(e[0], e[1], f[0], f[1]))
        });
        crosses
            || other.vertices().first().is_some_and(|c| self.contains(c))
            || self.vertices().first().is_some_and(|c| other.contains(c))
    }
}

const ORIENTATION_EPS: f64 = 1e-12;

/// Sign of the turn p → q → r: 0 collinear, 1 clockwise, 2 counter-clockwise.
fn orientation(p: Coordinate, q: Coordinate, r: Coordinate) -> u8 {
    let val = (q.lat - p.lat) * (r.lon - q.lon) - (q.lon - p.lon) * (r.lat - q.lat);
    if val.abs() < ORIENTATION_EPS {
        0
    } else if val > 0.0 {
        1
    } else {
        2
    }
}

/// Whether `q` lies within the bounding box of segment `p`–`r` (used for collinear points).
fn on_segment(p: Coordinate, q: Coordinate, r: Coordinate) -> bool {
    q.lon <= p.lon.max(r.lon)
        && q.lon >= p.lon.min(r.lon)
        && q.lat <= p.lat.max(r.lat)
        && q.lat >= p.lat.min(r.lat)
}

fn segments_intersect(p1: Coordinate, q1: Coordinate, p2: Coordinate, q2: Coordinate) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}
