//! Collaborator interfaces for persistence, vector search, spatial search,
//! and weather.
//!
//! The engine never calls these from inside the optimizer; hosts load what a
//! run needs up front. [`MemoryStore`] implements every trait in memory for
//! tests and embedded use. Serializing concurrent writes of a final schedule
//! is the store's job.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::{cosine_distance, l2_distance};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BurnRequest, Conflict, FeatureVector, Polygon, ScheduleAssignment, VectorKind,
    WeatherForecast, WeatherReading,
};

/// Burn request, conflict, and schedule persistence.
pub trait RequestStore {
    /// Inserts or replaces a request.
    fn put_request(&mut self, request: BurnRequest) -> EngineResult<()>;

    /// Request by id.
    fn get_request(&self, id: &str) -> EngineResult<Option<BurnRequest>>;

    /// Removes a request and its conflicts.
    fn remove_request(&mut self, id: &str) -> EngineResult<Option<BurnRequest>>;

    /// Requests whose requested date falls in `start..=end`.
    fn requests_between(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<BurnRequest>>;

    /// Records a conflict, replacing any record for the same pair.
    fn put_conflict(&mut self, conflict: Conflict) -> EngineResult<()>;

    /// Conflicts involving a request.
    fn conflicts_for(&self, request_id: &str) -> EngineResult<Vec<Conflict>>;

    /// Stores the assignments of a schedule, overwriting earlier ones per request.
    fn save_schedule(&mut self, schedule: &ScheduleAssignment) -> EngineResult<()>;

    /// The stored schedule.
    fn load_schedule(&self) -> EngineResult<ScheduleAssignment>;
}

/// How [`VectorIndex::find_nearest`] ranks candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cosine similarity`.
    Cosine,
    /// Euclidean distance.
    L2,
}

/// A stored vector near a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Owner of the stored vector.
    pub owner: String,
    /// Distance under the requested metric.
    pub distance: f64,
}

/// Nearest-neighbor search over feature vectors.
pub trait VectorIndex {
    /// Inserts or replaces the vector for `(kind, owner)`.
    fn upsert_vector(&mut self, vector: FeatureVector) -> EngineResult<()>;

    /// Up to `k` stored vectors of `kind` closest to `vector`, nearest first.
    fn find_nearest(
        &self,
        kind: VectorKind,
        vector: &[f64],
        k: usize,
        metric: DistanceMetric,
    ) -> EngineResult<Vec<Neighbor>>;
}

/// Spatial relation tested by [`SpatialIndex::spatial_query`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialPredicate {
    /// Field centroid within this many km of the query centroid.
    WithinDistance(f64),
    /// Field shares area or boundary with the query.
    Intersects,
    /// Field lies inside the query.
    ContainedBy,
}

/// Spatial search over request fields.
pub trait SpatialIndex {
    /// Ids of requests whose field satisfies `predicate` against `geometry`.
    fn spatial_query(
        &self,
        geometry: &Polygon,
        predicate: SpatialPredicate,
    ) -> EngineResult<Vec<String>>;
}

/// Source of daily weather.
pub trait WeatherProvider {
    /// Reading for a date, if available.
    fn reading_for(&self, date: NaiveDate) -> EngineResult<Option<WeatherReading>>;

    /// Readings for `start..=end`; dates without one are left out.
    fn forecast(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<WeatherForecast> {
        let mut forecast = WeatherForecast::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            if let Some(reading) = self.reading_for(date)? {
                forecast.insert(date, reading);
            }
        }
        Ok(forecast)
    }
}

/// In-memory implementation of every collaborator trait.
///
/// Vector search is brute force; spatial predicates use bounding boxes and
/// point-in-polygon tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    requests: BTreeMap<String, BurnRequest>,
    conflicts: BTreeMap<(String, String), Conflict>,
    schedule: ScheduleAssignment,
    vectors: HashMap<(VectorKind, String), FeatureVector>,
    weather: WeatherForecast,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weather served by [`WeatherProvider`].
    pub fn with_weather(mut self, weather: WeatherForecast) -> Self {
        self.weather = weather;
        self
    }

    /// All stored requests in id order.
    pub fn requests(&self) -> impl Iterator<Item = &BurnRequest> {
        self.requests.values()
    }

    /// All stored conflicts.
    pub fn conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.values()
    }
}

impl RequestStore for MemoryStore {
    fn put_request(&mut self, request: BurnRequest) -> EngineResult<()> {
        self.requests.insert(request.id.clone(), request);
        Ok(())
    }

    fn get_request(&self, id: &str) -> EngineResult<Option<BurnRequest>> {
        Ok(self.requests.get(id).cloned())
    }

    fn remove_request(&mut self, id: &str) -> EngineResult<Option<BurnRequest>> {
        self.conflicts.retain(|_, c| !c.involves(id));
        self.schedule.unassign(id);
        Ok(self.requests.remove(id))
    }

    fn requests_between(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<BurnRequest>> {
        Ok(self
            .requests
            .values()
            .filter(|r| r.requested_date.is_some_and(|d| d >= start && d <= end))
            .cloned()
            .collect())
    }

    fn put_conflict(&mut self, conflict: Conflict) -> EngineResult<()> {
        let key = (conflict.request_a.clone(), conflict.request_b.clone());
        self.conflicts.insert(key, conflict);
        Ok(())
    }

    fn conflicts_for(&self, request_id: &str) -> EngineResult<Vec<Conflict>> {
        Ok(self
            .conflicts
            .values()
            .filter(|c| c.involves(request_id))
            .cloned()
            .collect())
    }

    fn save_schedule(&mut self, schedule: &ScheduleAssignment) -> EngineResult<()> {
        for (id, slot) in schedule.iter() {
            self.schedule.assign(id, slot.clone());
        }
        Ok(())
    }

    fn load_schedule(&self) -> EngineResult<ScheduleAssignment> {
        Ok(self.schedule.clone())
    }
}

impl VectorIndex for MemoryStore {
    fn upsert_vector(&mut self, vector: FeatureVector) -> EngineResult<()> {
        self.vectors.insert((vector.kind, vector.owner.clone()), vector);
        Ok(())
    }

    fn find_nearest(
        &self,
        kind: VectorKind,
        vector: &[f64],
        k: usize,
        metric: DistanceMetric,
    ) -> EngineResult<Vec<Neighbor>> {
        if vector.len() != kind.dimension() {
            return Err(EngineError::DimensionMismatch {
                expected: kind.dimension(),
                actual: vector.len(),
            });
        }

        let mut neighbors = self
            .vectors
            .values()
            .filter(|v| v.kind == kind)
            .map(|v| {
                let distance = match metric {
                    DistanceMetric::Cosine => cosine_distance(vector, v.values())?,
                    DistanceMetric::L2 => l2_distance(vector, v.values())?,
                };
                Ok(Neighbor {
                    owner: v.owner.clone(),
                    distance,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.owner.cmp(&b.owner))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

impl SpatialIndex for MemoryStore {
    fn spatial_query(
        &self,
        geometry: &Polygon,
        predicate: SpatialPredicate,
    ) -> EngineResult<Vec<String>> {
        let origin = geometry.centroid();
        Ok(self
            .requests
            .values()
            .filter(|r| {
                let Some(field) = r.geometry.as_ref() else {
                    return false;
                };
                match predicate {
                    SpatialPredicate::WithinDistance(km) => match (origin, field.centroid()) {
                        (Some(o), Some(c)) => o.haversine_km(&c) <= km,
                        _ => false,
                    },
                    SpatialPredicate::Intersects => geometry.intersects(field),
                    SpatialPredicate::ContainedBy => {
                        !field.vertices().is_empty()
                            && field.vertices().iter().all(|c| geometry.contains(c))
                    }
                }
            })
            .map(|r| r.id.clone())
            .collect())
    }
}

impl WeatherProvider for MemoryStore {
    fn reading_for(&self, date: NaiveDate) -> EngineResult<Option<WeatherReading>> {
        Ok(self.weather.get(date).copied())
    }
}

impl WeatherProvider for WeatherForecast {
    fn reading_for(&self, date: NaiveDate) -> EngineResult<Option<WeatherReading>> {
        Ok(self.get(date).copied())
    }
}
