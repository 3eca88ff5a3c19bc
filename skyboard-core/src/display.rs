//! Conversions every renderer of the dashboard needs: icon URLs, display
//! units, day labels and the three chart series.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::model::{AlertTime, DailyForecast};

pub fn icon_url(icon_base: &str, code: &str) -> String {
    format!("{}/{code}@2x.png", icon_base.trim_end_matches('/'))
}

pub fn mps_to_kmh(mps: f64) -> i64 {
    (mps * 3.6).round() as i64
}

/// Metres to kilometres with one decimal, e.g. `10000` → `"10.0"`.
pub fn metres_to_km(metres: u32) -> String {
    format!("{:.1}", f64::from(metres) / 1000.0)
}

/// Upper-cases the first character only.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Today" for the first card, the short weekday otherwise.
pub fn day_label<Tz: TimeZone>(index: usize, dt: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    if index == 0 {
        return "Today".to_string();
    }
    DateTime::from_timestamp(dt, 0)
        .map(|utc| utc.with_timezone(tz).format("%a").to_string())
        .unwrap_or_else(|| "?".to_string())
}

pub fn day_labels<Tz: TimeZone>(daily: &[DailyForecast], tz: &Tz) -> Vec<String>
where
    Tz::Offset: Display,
{
    daily
        .iter()
        .enumerate()
        .map(|(i, day)| day_label(i, day.dt, tz))
        .collect()
}

pub fn format_alert_time<Tz: TimeZone>(time: &AlertTime, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match time {
        AlertTime::Range { start, end } => format!(
            "From: {} To: {}",
            start.with_timezone(tz).format("%Y-%m-%d %H:%M"),
            end.with_timezone(tz).format("%Y-%m-%d %H:%M"),
        ),
        AlertTime::Freeform(text) => text.clone(),
    }
}

/// Rounded daily highs and lows, °C.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSeries {
    pub labels: Vec<String>,
    pub max: Vec<i64>,
    pub min: Vec<i64>,
}

/// Rain volume (mm) against chance of rain (%).
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationSeries {
    pub labels: Vec<String>,
    pub volume_mm: Vec<f64>,
    pub chance_pct: Vec<f64>,
}

/// Wind speed and gust, km/h. A missing gust plots as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSeries {
    pub labels: Vec<String>,
    pub speed_kmh: Vec<i64>,
    pub gust_kmh: Vec<i64>,
}

pub fn temperature_series<Tz: TimeZone>(daily: &[DailyForecast], tz: &Tz) -> TemperatureSeries
where
    Tz::Offset: Display,
{
    TemperatureSeries {
        labels: day_labels(daily, tz),
        max: daily.iter().map(|d| d.temp.max.round() as i64).collect(),
        min: daily.iter().map(|d| d.temp.min.round() as i64).collect(),
    }
}

pub fn precipitation_series<Tz: TimeZone>(daily: &[DailyForecast], tz: &Tz) -> PrecipitationSeries
where
    Tz::Offset: Display,
{
    PrecipitationSeries {
        labels: day_labels(daily, tz),
        volume_mm: daily.iter().map(|d| d.rain_mm.unwrap_or(0.0)).collect(),
        chance_pct: daily.iter().map(|d| d.pop * 100.0).collect(),
    }
}

pub fn wind_series<Tz: TimeZone>(daily: &[DailyForecast], tz: &Tz) -> WindSeries
where
    Tz::Offset: Display,
{
    WindSeries {
        labels: day_labels(daily, tz),
        speed_kmh: daily.iter().map(|d| mps_to_kmh(d.wind_speed_mps)).collect(),
        gust_kmh: daily
            .iter()
            .map(|d| d.wind_gust_mps.map(mps_to_kmh).unwrap_or(0))
            .collect(),
    }
}
