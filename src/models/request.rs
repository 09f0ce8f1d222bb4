//! Burn request model.
//!
//! A burn request is one operator's ask to burn one field on a preferred
//! day and time window. It is the unit the optimizer assigns to a slot.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──schedule──▶ Scheduled ──schedule──▶ Rescheduled ─┐
//!    │                      │                        ▲        │
//!    └──────cancel──────────┴──────cancel────────────┼────────┴─▶ Cancelled
//!                           └──complete──▶ Completed └─schedule
//! ```
//!
//! Cancelled and Completed are terminal.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Coordinate, Polygon, TimeSlot};
use crate::error::{EngineError, EngineResult};

/// Why a field is being burned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnPurpose {
    /// Hazard fuel reduction ahead of fire season.
    WildfirePrevention,
    /// Destroying diseased crop residue.
    DiseaseControl,
    /// Pest habitat removal.
    PestControl,
    /// Habitat or rangeland restoration.
    HabitatManagement,
    /// Routine post-harvest residue removal.
    ResidueManagement,
    /// Anything else.
    Other,
}

/// Dominant fuel on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Cereal stubble and straw (wheat, rice, barley, corn).
    #[default]
    CropResidue,
    /// Pasture and rangeland grass.
    Grass,
    /// Shrubs and brush.
    Brush,
    /// Orchard and vineyard prunings.
    OrchardPrunings,
    /// Standing or felled timber.
    Timber,
}

impl FuelType {
    /// PM2.5 emitted per kilogram of fuel consumed (g/kg).
    pub fn pm25_emission_factor(&self) -> f64 {
        match self {
            Self::CropResidue => 6.3,
            Self::Grass => 7.2,
            Self::Brush => 9.0,
            Self::OrchardPrunings => 8.5,
            Self::Timber => 12.0,
        }
    }
}

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted and validated, not yet placed.
    #[default]
    Pending,
    /// Placed in a slot.
    Scheduled,
    /// Moved to a different slot after first placement.
    Rescheduled,
    /// Withdrawn; terminal.
    Cancelled,
    /// Burned; terminal.
    Completed,
}

impl RequestStatus {
    /// Whether the request has left the scheduling pool for good.
    pub fn is_retired(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Rescheduled => "rescheduled",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Terrain and vegetation attributes of a field.
///
/// Every attribute is optional; encoders and scorers substitute neutral
/// values for anything missing or non-finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainAttributes {
    /// Mean elevation (m above sea level).
    pub elevation_m: Option<f64>,
    /// Mean slope (degrees).
    pub slope_deg: Option<f64>,
    /// Fuel load (tons/hectare).
    pub fuel_load_tons_per_ha: Option<f64>,
    /// Vegetation cover fraction (0.0..1.0).
    pub vegetation_density: Option<f64>,
}

/// An agricultural burn request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRequest {
    /// Unique request identifier.
    pub id: String,
    /// Submitting farm.
    pub farm_id: Option<String>,
    /// Field within the farm.
    pub field_id: Option<String>,
    /// Field boundary.
    pub geometry: Option<Polygon>,
    /// Burn area (hectares).
    pub area_hectares: f64,
    /// Terrain and fuel attributes.
    pub terrain: TerrainAttributes,
    /// Dominant fuel.
    pub fuel_type: FuelType,
    /// Burn purpose. `None` scores as a neutral routine burn.
    pub purpose: Option<BurnPurpose>,
    /// Preferred burn date.
    pub requested_date: Option<NaiveDate>,
    /// Requested ignition time, `"HH:MM"` as submitted.
    pub requested_start: Option<String>,
    /// Requested end time, `"HH:MM"` as submitted.
    pub requested_end: Option<String>,
    /// Derived priority (0-100). `None` until scored.
    pub priority_score: Option<f64>,
    /// Fraction of this operator's past burns completed without incident (0.0..1.0).
    pub historical_success_rate: Option<f64>,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// Slot currently holding this request.
    pub assigned_slot: Option<TimeSlot>,
}

impl BurnRequest {
    /// Creates an empty request with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            farm_id: None,
            field_id: None,
            geometry: None,
            area_hectares: 0.0,
            terrain: TerrainAttributes::default(),
            fuel_type: FuelType::default(),
            purpose: None,
            requested_date: None,
            requested_start: None,
            requested_end: None,
            priority_score: None,
            historical_success_rate: None,
            status: RequestStatus::Pending,
            assigned_slot: None,
        }
    }

    /// Sets the farm and field identity.
    pub fn with_farm(mut self, farm_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        self.farm_id = Some(farm_id.into());
        self.field_id = Some(field_id.into());
        self
    }

    /// Sets the field boundary.
    pub fn with_geometry(mut self, geometry: Polygon) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Sets the burn area.
    pub fn with_area(mut self, hectares: f64) -> Self {
        self.area_hectares = hectares;
        self
    }

    /// Sets terrain attributes.
    pub fn with_terrain(mut self, terrain: TerrainAttributes) -> Self {
        self.terrain = terrain;
        self
    }

    /// Sets the fuel load (tons/hectare).
    pub fn with_fuel_load(mut self, tons_per_ha: f64) -> Self {
        self.terrain.fuel_load_tons_per_ha = Some(tons_per_ha);
        self
    }

    /// Sets the fuel type.
    pub fn with_fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    /// Sets the burn purpose.
    pub fn with_purpose(mut self, purpose: BurnPurpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Sets the preferred date and `"HH:MM"` window.
    pub fn with_window(
        mut self,
        date: NaiveDate,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.requested_date = Some(date);
        self.requested_start = Some(start.into());
        self.requested_end = Some(end.into());
        self
    }

    /// Sets an explicit priority score.
    pub fn with_priority(mut self, score: f64) -> Self {
        self.priority_score = Some(score);
        self
    }

    /// Sets the historical success rate.
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.historical_success_rate = Some(rate);
        self
    }

    /// Fuel load (tons/hectare), if known.
    pub fn fuel_load(&self) -> Option<f64> {
        self.terrain.fuel_load_tons_per_ha
    }

    /// Field centroid, if the geometry is present.
    pub fn location(&self) -> Option<Coordinate> {
        self.geometry.as_ref().and_then(Polygon::centroid)
    }

    /// Requested ignition time, parsed.
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.requested_start.as_deref().and_then(parse_time_of_day)
    }

    /// Requested end time, parsed.
    pub fn end_time(&self) -> Option<NaiveTime> {
        self.requested_end.as_deref().and_then(parse_time_of_day)
    }

    /// Requested burn duration (hours), when both times parse.
    pub fn duration_hours(&self) -> Option<f64> {
        let (start, end) = (self.start_time()?, self.end_time()?);
        Some((end - start).num_minutes() as f64 / 60.0)
    }

    /// Places the request in a slot.
    ///
    /// The first placement moves a pending request to `Scheduled`; any later
    /// placement into a different slot marks it `Rescheduled`.
    pub fn schedule(&mut self, slot: TimeSlot) -> EngineResult<()> {
        if self.status.is_retired() {
            return Err(self.transition_error(RequestStatus::Scheduled));
        }
        let moved = self
            .assigned_slot
            .as_ref()
            .is_some_and(|current| current.id != slot.id);
        self.status = if moved {
            RequestStatus::Rescheduled
        } else if self.status == RequestStatus::Pending {
            RequestStatus::Scheduled
        } else {
            self.status
        };
        self.assigned_slot = Some(slot);
        Ok(())
    }

    /// Withdraws the request.
    pub fn cancel(&mut self) -> EngineResult<()> {
        if self.status.is_retired() {
            return Err(self.transition_error(RequestStatus::Cancelled));
        }
        self.status = RequestStatus::Cancelled;
        Ok(())
    }

    /// Marks a placed request as burned.
    pub fn complete(&mut self) -> EngineResult<()> {
        if self.status.is_retired() || self.assigned_slot.is_none() {
            return Err(self.transition_error(RequestStatus::Completed));
        }
        self.status = RequestStatus::Completed;
        Ok(())
    }

    fn transition_error(&self, to: RequestStatus) -> EngineError {
        EngineError::InvalidTransition {
            id: self.id.clone(),
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

/// Parses a strict `"HH:MM"` time of day (00:00–23:59).
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotPeriod;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn test_request_builder() {
        let req = BurnRequest::new("R1")
            .with_farm("F1", "north")
            .with_area(40.0)
            .with_fuel_load(12.0)
            .with_purpose(BurnPurpose::WildfirePrevention)
            .with_window(date(25), "08:00", "12:00")
            .with_success_rate(0.9);

        assert_eq!(req.id, "R1");
        assert_eq!(req.farm_id.as_deref(), Some("F1"));
        assert_eq!(req.field_id.as_deref(), Some("north"));
        assert_eq!(req.fuel_load(), Some(12.0));
        assert_eq!(req.requested_date, Some(date(25)));
        assert_eq!(req.duration_hours(), Some(4.0));
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("06:30"), NaiveTime::from_hms_opt(6, 30, 0));
        assert_eq!(parse_time_of_day("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert!(parse_time_of_day("24:00").is_none());
        assert!(parse_time_of_day("12:60").is_none());
        assert!(parse_time_of_day("noon").is_none());
    }

    #[test]
    fn test_lifecycle_schedule_then_reschedule() {
        let mut req = BurnRequest::new("R1");
        req.schedule(TimeSlot::new(date(25), SlotPeriod::Morning)).unwrap();
        assert_eq!(req.status, RequestStatus::Scheduled);

        // Same slot again is not a move
        req.schedule(TimeSlot::new(date(25), SlotPeriod::Morning)).unwrap();
        assert_eq!(req.status, RequestStatus::Scheduled);

        req.schedule(TimeSlot::new(date(26), SlotPeriod::Midday)).unwrap();
        assert_eq!(req.status, RequestStatus::Rescheduled);
        assert_eq!(req.assigned_slot.as_ref().unwrap().id, "2025-08-26_midday");
    }

    #[test]
    fn test_lifecycle_terminal_states() {
        let mut req = BurnRequest::new("R1");
        assert!(req.complete().is_err()); // never placed

        req.schedule(TimeSlot::new(date(25), SlotPeriod::Afternoon)).unwrap();
        req.complete().unwrap();
        assert_eq!(req.status, RequestStatus::Completed);
        assert!(req.cancel().is_err());
        assert!(matches!(
            req.schedule(TimeSlot::new(date(26), SlotPeriod::Morning)),
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_emission_factor_ordering() {
        assert!(FuelType::Timber.pm25_emission_factor() > FuelType::CropResidue.pm25_emission_factor());
    }
}
