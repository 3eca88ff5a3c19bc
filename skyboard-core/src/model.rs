use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Snapshot of the current-weather response, already merged with the UV index
/// of the forecast that accompanied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    /// Metres. Some stations omit it.
    pub visibility_m: Option<u32>,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
    pub uv_index: Option<f64>,
}

/// Primary weather condition of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn unknown() -> Self {
        Self {
            main: "Unknown".to_string(),
            description: "unknown".to_string(),
            icon: "01d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Epoch seconds.
    pub dt: i64,
    pub temp: TempRange,
    pub condition: Condition,
    /// Probability of precipitation, 0..=1.
    pub pop: f64,
    pub wind_speed_mps: f64,
    pub wind_gust_mps: Option<f64>,
    /// Rain volume for the period, mm.
    pub rain_mm: Option<f64>,
}

/// Which upstream shape a forecast was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    OneCall,
    FiveDayAggregate,
    Synthetic,
}

impl std::fmt::Display for ForecastSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ForecastSource::OneCall => "one call",
            ForecastSource::FiveDayAggregate => "5-day aggregate",
            ForecastSource::Synthetic => "synthetic",
        })
    }
}

/// Alert as published by the provider, before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAlert {
    pub sender_name: Option<String>,
    pub event: String,
    pub description: String,
    pub start: i64,
    pub end: i64,
}

/// Normalized forecast, whatever tier produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub source: ForecastSource,
    pub current_uvi: Option<f64>,
    pub daily: Vec<DailyForecast>,
    pub alerts: Vec<ProviderAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertTime {
    Range { start: DateTime<Utc>, end: DateTime<Utc> },
    Freeform(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertProvenance {
    Real,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub description: String,
    pub time: AlertTime,
    /// Provider alerts carry no tier.
    pub severity: Option<Severity>,
    pub provenance: AlertProvenance,
}

/// Everything one successful update cycle produced. Applied as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub coordinates: Coordinates,
    pub current: CurrentConditions,
    pub forecast: Forecast,
    pub alerts: Vec<Alert>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Daily entries as the presentation layer shows them.
    pub fn daily(&self) -> &[DailyForecast] {
        let len = self.forecast.daily.len().min(crate::normalize::MAX_DAYS);
        &self.forecast.daily[..len]
    }
}
