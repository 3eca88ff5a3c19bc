//! Reconciles provider payloads into the dashboard's [`Forecast`] and
//! [`CurrentConditions`] read models.
//!
//! Day boundaries of the 5-day aggregation follow the timezone passed in by
//! the caller, so the same payload can bucket differently for viewers in
//! different zones.

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::{
    model::{
        Condition, CurrentConditions, DailyForecast, Forecast, ForecastSource, ProviderAlert,
        TempRange,
    },
    provider::openweather::{CurrentRaw, FiveDayEntry, FiveDayRaw, OneCallRaw, OwWeather},
};

/// Forecast cards shown by the dashboard.
pub const MAX_DAYS: usize = 7;

/// UV index reported when the forecast source carries none.
pub const PLACEHOLDER_UVI: f64 = 5.0;

fn condition_of(weather: &[OwWeather]) -> Condition {
    weather
        .first()
        .map(|w| Condition {
            main: w.main.clone(),
            description: w.description.clone(),
            icon: w.icon.clone(),
        })
        .unwrap_or_else(Condition::unknown)
}

/// Index of the entry that stands for a bucket of `len` readings.
pub fn representative_index(len: usize) -> usize {
    len / 2
}

/// Maps the current-weather response, taking the UV index from the forecast.
pub fn current_conditions(raw: &CurrentRaw, uv_index: Option<f64>) -> CurrentConditions {
    let condition = condition_of(&raw.weather);

    CurrentConditions {
        location_name: raw.name.clone(),
        country: raw.sys.country.clone(),
        temperature_c: raw.main.temp,
        feels_like_c: raw.main.feels_like,
        humidity_pct: raw.main.humidity,
        pressure_hpa: raw.main.pressure,
        visibility_m: raw.visibility,
        wind_speed_mps: raw.wind.speed,
        description: condition.description,
        icon: condition.icon,
        uv_index,
    }
}

/// One Call payloads are already daily; only the shape changes.
pub fn from_one_call(raw: OneCallRaw) -> Forecast {
    let daily = raw
        .daily
        .into_iter()
        .take(MAX_DAYS)
        .map(|day| DailyForecast {
            dt: day.dt,
            temp: TempRange {
                max: day.temp.max,
                min: day.temp.min,
            },
            condition: condition_of(&day.weather),
            pop: day.pop,
            wind_speed_mps: day.wind_speed,
            wind_gust_mps: day.wind_gust,
            rain_mm: day.rain,
        })
        .collect();

    let alerts = raw
        .alerts
        .into_iter()
        .map(|a| ProviderAlert {
            sender_name: a.sender_name,
            event: a.event,
            description: a.description,
            start: a.start,
            end: a.end,
        })
        .collect();

    Forecast {
        source: ForecastSource::OneCall,
        current_uvi: raw.current.map(|c| c.uvi),
        daily,
        alerts,
    }
}

fn local_date<Tz: TimeZone>(dt: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(dt, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Buckets 3-hour readings into days, in the order the days first appear.
pub fn group_by_local_date<'a, Tz: TimeZone>(
    entries: &'a [FiveDayEntry],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<&'a FiveDayEntry>)> {
    let mut groups: Vec<(NaiveDate, Vec<&FiveDayEntry>)> = Vec::new();

    for entry in entries {
        let Some(date) = local_date(entry.dt, tz) else {
            continue;
        };
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(entry),
            None => groups.push((date, vec![entry])),
        }
    }

    groups
}

fn summarize(bucket: &[&FiveDayEntry]) -> Option<DailyForecast> {
    let first = bucket.first()?;
    let rep = bucket[representative_index(bucket.len())];

    let (max, min) = bucket
        .iter()
        .map(|e| e.main.temp)
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), t| {
            (hi.max(t), lo.min(t))
        });

    Some(DailyForecast {
        dt: first.dt,
        temp: TempRange { max, min },
        condition: condition_of(&rep.weather),
        pop: first.pop.unwrap_or(0.0),
        wind_speed_mps: rep.wind.speed,
        wind_gust_mps: rep.wind.gust,
        rain_mm: rep.rain.as_ref().and_then(|r| r.three_hours),
    })
}

/// Collapses the 5-day/3-hour forecast into at most [`MAX_DAYS`] daily entries.
///
/// Per day: the temperature range spans every reading, the condition and wind
/// figures come from the middle reading, and the precipitation chance from the
/// first one.
pub fn aggregate_five_day<Tz: TimeZone>(raw: &FiveDayRaw, tz: &Tz) -> Forecast {
    let daily = group_by_local_date(&raw.list, tz)
        .into_iter()
        .take(MAX_DAYS)
        .filter_map(|(_, bucket)| summarize(&bucket))
        .collect();

    Forecast {
        source: ForecastSource::FiveDayAggregate,
        current_uvi: Some(PLACEHOLDER_UVI),
        daily,
        alerts: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{FiveDayMain, FiveDayRain, OwWind};
    use chrono::{FixedOffset, Utc};

    // 2024-03-10T00:00:00Z
    const MIDNIGHT_UTC: i64 = 1_710_028_800;
    const HOUR: i64 = 3600;

    fn entry(dt: i64, temp: f64, main: &str) -> FiveDayEntry {
        FiveDayEntry {
            dt,
            main: FiveDayMain { temp },
            weather: vec![OwWeather {
                main: main.to_string(),
                description: main.to_lowercase(),
                icon: "02d".to_string(),
            }],
            wind: OwWind {
                speed: temp / 10.0,
                gust: Some(temp / 5.0),
            },
            pop: Some(temp / 100.0),
            rain: None,
        }
    }

    /// `days` days of eight 3-hourly readings starting at UTC midnight.
    fn steady_days(days: i64) -> FiveDayRaw {
        let list = (0..days * 8)
            .map(|i| entry(MIDNIGHT_UTC + i * 3 * HOUR, 10.0 + (i % 8) as f64, "Clouds"))
            .collect();
        FiveDayRaw { list }
    }

    #[test]
    fn representative_is_floor_of_midpoint() {
        assert_eq!(representative_index(1), 0);
        assert_eq!(representative_index(2), 1);
        assert_eq!(representative_index(3), 1);
        assert_eq!(representative_index(4), 2);
        assert_eq!(representative_index(8), 4);
    }

    #[test]
    fn aggregate_emits_one_entry_per_day_with_bounds() {
        let raw = steady_days(5);
        let forecast = aggregate_five_day(&raw, &Utc);

        assert_eq!(forecast.source, ForecastSource::FiveDayAggregate);
        assert_eq!(forecast.daily.len(), 5);
        for (day, chunk) in forecast.daily.iter().zip(raw.list.chunks(8)) {
            for reading in chunk {
                assert!(day.temp.max >= reading.main.temp);
                assert!(day.temp.min <= reading.main.temp);
            }
            assert_eq!(day.dt, chunk[0].dt);
        }
        assert_eq!(forecast.daily[0].temp.max, 17.0);
        assert_eq!(forecast.daily[0].temp.min, 10.0);
    }

    #[test]
    fn aggregate_caps_at_seven_days() {
        let forecast = aggregate_five_day(&steady_days(9), &Utc);
        assert_eq!(forecast.daily.len(), MAX_DAYS);
    }

    #[test]
    fn middle_reading_supplies_condition_and_wind_first_supplies_pop() {
        let mut list = vec![
            entry(MIDNIGHT_UTC, 11.0, "Clear"),
            entry(MIDNIGHT_UTC + 3 * HOUR, 12.0, "Clouds"),
            entry(MIDNIGHT_UTC + 6 * HOUR, 13.0, "Rain"),
            entry(MIDNIGHT_UTC + 9 * HOUR, 14.0, "Snow"),
        ];
        list[2].rain = Some(FiveDayRain {
            three_hours: Some(0.6),
        });
        let forecast = aggregate_five_day(&FiveDayRaw { list }, &Utc);

        let day = &forecast.daily[0];
        assert_eq!(day.condition.main, "Rain");
        assert_eq!(day.wind_speed_mps, 1.3);
        assert_eq!(day.wind_gust_mps, Some(13.0 / 5.0));
        assert_eq!(day.pop, 0.11);
        assert_eq!(day.rain_mm, Some(0.6));
    }

    #[test]
    fn single_reading_day_uses_that_reading() {
        let list = vec![entry(MIDNIGHT_UTC + 21 * HOUR, 9.0, "Mist")];
        let forecast = aggregate_five_day(&FiveDayRaw { list }, &Utc);

        assert_eq!(forecast.daily.len(), 1);
        assert_eq!(forecast.daily[0].condition.main, "Mist");
        assert_eq!(forecast.daily[0].temp.max, 9.0);
        assert_eq!(forecast.daily[0].temp.min, 9.0);
    }

    #[test]
    fn missing_pop_and_rain_default_sensibly() {
        let mut reading = entry(MIDNIGHT_UTC, 20.0, "Clear");
        reading.pop = None;
        reading.wind.gust = None;
        let forecast = aggregate_five_day(&FiveDayRaw { list: vec![reading] }, &Utc);

        assert_eq!(forecast.daily[0].pop, 0.0);
        assert_eq!(forecast.daily[0].wind_gust_mps, None);
        assert_eq!(forecast.daily[0].rain_mm, None);
    }

    #[test]
    fn five_day_forecast_reports_placeholder_uvi() {
        let forecast = aggregate_five_day(&steady_days(1), &Utc);
        assert_eq!(forecast.current_uvi, Some(PLACEHOLDER_UVI));
        assert!(forecast.alerts.is_empty());
    }

    #[test]
    fn day_boundaries_follow_viewer_timezone() {
        // 22:00Z and 23:00Z on the 10th, then 01:00Z on the 11th.
        let list = vec![
            entry(MIDNIGHT_UTC + 22 * HOUR, 10.0, "Clear"),
            entry(MIDNIGHT_UTC + 23 * HOUR, 11.0, "Clear"),
            entry(MIDNIGHT_UTC + 25 * HOUR, 12.0, "Clear"),
        ];
        let raw = FiveDayRaw { list };

        let utc = aggregate_five_day(&raw, &Utc);
        assert_eq!(utc.daily.len(), 2);

        // At UTC+05:30 all three readings fall on the 11th.
        let colombo = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let local = aggregate_five_day(&raw, &colombo);
        assert_eq!(local.daily.len(), 1);
        assert_eq!(local.daily[0].temp.max, 12.0);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let list = vec![
            entry(MIDNIGHT_UTC + 30 * HOUR, 5.0, "Clear"),
            entry(MIDNIGHT_UTC + 3 * HOUR, 6.0, "Clear"),
            entry(MIDNIGHT_UTC + 33 * HOUR, 7.0, "Clear"),
        ];
        let groups = group_by_local_date(&list, &Utc);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
        assert!(groups[0].0 > groups[1].0);
    }

    #[test]
    fn one_call_is_trimmed_and_keeps_uvi_and_alerts() {
        let daily: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "dt": MIDNIGHT_UTC + i * 86_400,
                    "temp": { "max": 31.0, "min": 24.0 },
                    "weather": [{ "main": "Rain", "description": "moderate rain", "icon": "10d" }],
                    "pop": 0.9,
                    "wind_speed": 5.0,
                    "rain": 12.5
                })
            })
            .collect();
        let raw: OneCallRaw = serde_json::from_value(serde_json::json!({
            "current": { "uvi": 7.4 },
            "daily": daily,
            "alerts": [{
                "sender_name": "Met Department",
                "event": "Heavy Rain",
                "start": MIDNIGHT_UTC,
                "end": MIDNIGHT_UTC + 86_400,
                "description": "Over 100 mm expected"
            }]
        }))
        .unwrap();

        let forecast = from_one_call(raw);
        assert_eq!(forecast.source, ForecastSource::OneCall);
        assert_eq!(forecast.current_uvi, Some(7.4));
        assert_eq!(forecast.daily.len(), MAX_DAYS);
        assert_eq!(forecast.daily[0].rain_mm, Some(12.5));
        assert_eq!(forecast.daily[0].wind_gust_mps, None);
        assert_eq!(forecast.alerts[0].event, "Heavy Rain");
    }

    #[test]
    fn current_conditions_carry_forecast_uvi() {
        let raw: CurrentRaw = serde_json::from_value(serde_json::json!({
            "coord": { "lat": 6.93, "lon": 79.85 },
            "name": "Colombo",
            "main": { "temp": 29.3, "feels_like": 33.1, "humidity": 74, "pressure": 1009 },
            "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
            "wind": { "speed": 4.1 },
            "visibility": 10000,
            "sys": { "country": "LK" }
        }))
        .unwrap();

        let current = current_conditions(&raw, Some(5.0));
        assert_eq!(current.location_name, "Colombo");
        assert_eq!(current.country, "LK");
        assert_eq!(current.description, "scattered clouds");
        assert_eq!(current.icon, "03d");
        assert_eq!(current.visibility_m, Some(10_000));
        assert_eq!(current.uv_index, Some(5.0));
    }
}
