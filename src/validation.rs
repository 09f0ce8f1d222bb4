//! Input validation for burn requests.
//!
//! Checks structural, geometric, and temporal integrity of a request
//! before it enters encoding or optimization. Detects:
//! - Missing required fields (farm, geometry, date, window)
//! - Unclosed, degenerate, or self-intersecting field rings
//! - Coordinates outside the WGS84 domain
//! - Malformed or inverted time windows, over-long burns
//! - Non-positive or oversized burn areas
//!
//! Validation is a pure check: nothing is corrected, every failure is reported.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{parse_time_of_day, BurnRequest, Polygon};

/// Validation result carrying every detected issue.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is absent or blank.
    MissingField,
    /// The ring's first and last points differ.
    UnclosedRing,
    /// The ring has fewer than three distinct vertices.
    DegenerateRing,
    /// Two non-adjacent ring edges cross.
    SelfIntersecting,
    /// A coordinate lies outside [-180, 180] × [-90, 90].
    CoordinateOutOfRange,
    /// A time is not a valid `"HH:MM"` between 00:00 and 23:59.
    InvalidTimeOfDay,
    /// The window ends at or before it starts.
    EndBeforeStart,
    /// The window is longer than the configured maximum.
    DurationExceeded,
    /// Area is non-finite or not positive.
    InvalidArea,
    /// Area is larger than the configured maximum.
    AreaExceeded,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Configured request limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Longest allowed burn window (hours).
    pub max_burn_duration_hours: f64,
    /// Largest allowed burn area (hectares).
    pub max_area_hectares: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_burn_duration_hours: 12.0,
            max_area_hectares: 2_000.0,
        }
    }
}

/// Structural/geometric/temporal gate in front of the engine.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    limits: ValidationLimits,
}

impl RequestValidator {
    /// Creates a validator with the given limits.
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Active limits.
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validates a request, stopping at the first failure.
    pub fn validate(&self, request: &BurnRequest) -> Result<(), ValidationError> {
        match self.validate_all(request) {
            Ok(()) => Ok(()),
            Err(mut errors) => Err(errors.remove(0)),
        }
    }

    /// Validates a request and collects every failure.
    ///
    /// Checks:
    /// 1. Farm id, geometry, requested date, start and end time are present
    /// 2. Every coordinate is inside the WGS84 domain
    /// 3. The ring is closed, non-degenerate, and simple
    /// 4. Start and end parse as `"HH:MM"` and end > start
    /// 5. Window length ≤ `max_burn_duration_hours`
    /// 6. 0 < area ≤ `max_area_hectares`
    pub fn validate_all(&self, request: &BurnRequest) -> ValidationResult {
        let mut errors = Vec::new();

        check_required_fields(request, &mut errors);
        if let Some(geometry) = &request.geometry {
            check_geometry(geometry, &mut errors);
        }
        self.check_window(request, &mut errors);
        self.check_area(request, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_window(&self, request: &BurnRequest, errors: &mut Vec<ValidationError>) {
        let start = parse_field(request.requested_start.as_deref(), "start", errors);
        let end = parse_field(request.requested_end.as_deref(), "end", errors);

        let (Some(start), Some(end)) = (start, end) else {
            return;
        };
        if end <= start {
            errors.push(ValidationError::new(
                ValidationErrorKind::EndBeforeStart,
                format!("Request '{}' ends at {end} before it starts at {start}", request.id),
            ));
            return;
        }

        let hours = (end - start).num_minutes() as f64 / 60.0;
        if hours > self.limits.max_burn_duration_hours {
            errors.push(ValidationError::new(
                ValidationErrorKind::DurationExceeded,
                format!(
                    "Request '{}' burns for {hours:.1}h, limit is {:.1}h",
                    request.id, self.limits.max_burn_duration_hours
                ),
            ));
        }
    }

    fn check_area(&self, request: &BurnRequest, errors: &mut Vec<ValidationError>) {
        let area = request.area_hectares;
        if !area.is_finite() || area <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidArea,
                format!("Request '{}' has invalid area {area}", request.id),
            ));
        } else if area > self.limits.max_area_hectares {
            errors.push(ValidationError::new(
                ValidationErrorKind::AreaExceeded,
                format!(
                    "Request '{}' covers {area} ha, limit is {} ha",
                    request.id, self.limits.max_area_hectares
                ),
            ));
        }
    }
}

/// Validates a request against the default limits.
pub fn validate(request: &BurnRequest) -> Result<(), ValidationError> {
    RequestValidator::default().validate(request)
}

fn check_required_fields(request: &BurnRequest, errors: &mut Vec<ValidationError>) {
    let mut missing = Vec::new();
    if request.farm_id.as_deref().map_or(true, |f| f.trim().is_empty()) {
        missing.push("farm_id");
    }
    if request.geometry.is_none() {
        missing.push("geometry");
    }
    if request.requested_date.is_none() {
        missing.push("requested_date");
    }
    if request.requested_start.is_none() {
        missing.push("requested_start");
    }
    if request.requested_end.is_none() {
        missing.push("requested_end");
    }

    for field in missing {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            format!("Request '{}' is missing {field}", request.id),
        ));
    }
}

fn check_geometry(geometry: &Polygon, errors: &mut Vec<ValidationError>) {
    if let Some(bad) = geometry.ring.iter().find(|c| !c.is_in_range()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CoordinateOutOfRange,
            format!("Coordinate ({}, {}) is outside WGS84 bounds", bad.lon, bad.lat),
        ));
    }

    if !geometry.is_closed() {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnclosedRing,
            "Field ring does not end at its first point",
        ));
        return;
    }

    // Closed ring of a triangle needs 4 points
    if geometry.ring.len() < 4 {
        errors.push(ValidationError::new(
            ValidationErrorKind::DegenerateRing,
            format!("Field ring has only {} points", geometry.ring.len()),
        ));
        return;
    }

    if geometry.is_self_intersecting() {
        errors.push(ValidationError::new(
            ValidationErrorKind::SelfIntersecting,
            "Field ring crosses itself",
        ));
    }
}

fn parse_field(
    raw: Option<&str>,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<chrono::NaiveTime> {
    let raw = raw?;
    let parsed = parse_time_of_day(raw);
    if parsed.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTimeOfDay,
            format!("Requested {label} time '{raw}' is not a valid HH:MM between 00:00 and 23:59"),
        ));
    }
    parsed
}
