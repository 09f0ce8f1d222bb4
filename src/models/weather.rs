//! Weather readings and per-date forecasts.
//!
//! Units follow the provider feed: wind in mph, temperature in °F,
//! relative humidity in percent, direction in degrees the wind blows *from*.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single aggregate weather reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Sustained wind speed (mph).
    pub wind_speed: f64,
    /// Wind origin (degrees clockwise from north).
    pub wind_direction: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Air temperature (°F).
    pub temperature: f64,
    /// Observation or forecast valid time.
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReading {
    /// Creates a reading without a timestamp.
    pub fn new(wind_speed: f64, wind_direction: f64, humidity: f64, temperature: f64) -> Self {
        Self {
            wind_speed,
            wind_direction,
            humidity,
            temperature,
            observed_at: None,
        }
    }

    /// Moderate conditions used whenever a date has no reading.
    ///
    /// Wind 5 mph from the south, 50 % humidity, 70 °F. Triggers no weather penalty.
    pub fn neutral() -> Self {
        Self::new(5.0, 180.0, 50.0, 70.0)
    }

    /// Attaches the valid time.
    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    /// Wind speed in m/s, floored so plume math never divides by zero.
    pub fn wind_speed_m_s(&self) -> f64 {
        let mph = if self.wind_speed.is_finite() {
            self.wind_speed
        } else {
            Self::neutral().wind_speed
        };
        (mph * 0.44704).max(0.5)
    }
}

impl Default for WeatherReading {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Daily weather aggregates keyed by date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherForecast {
    readings: BTreeMap<NaiveDate, WeatherReading>,
}

impl WeatherForecast {
    /// Creates an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the reading for a date.
    pub fn with_reading(mut self, date: NaiveDate, reading: WeatherReading) -> Self {
        self.readings.insert(date, reading);
        self
    }

    /// Sets the reading for a date.
    pub fn insert(&mut self, date: NaiveDate, reading: WeatherReading) {
        self.readings.insert(date, reading);
    }

    /// Reading for a date, if one exists.
    pub fn get(&self, date: NaiveDate) -> Option<&WeatherReading> {
        self.readings.get(&date)
    }

    /// Reading for a date, or [`WeatherReading::neutral`].
    pub fn reading_or_neutral(&self, date: NaiveDate) -> WeatherReading {
        self.readings.get(&date).copied().unwrap_or_else(WeatherReading::neutral)
    }

    /// Number of dates covered.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether no dates are covered.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl FromIterator<(NaiveDate, WeatherReading)> for WeatherForecast {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, WeatherReading)>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}
