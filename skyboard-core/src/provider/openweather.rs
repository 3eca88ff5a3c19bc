use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{config::Config, error::WeatherError, model::Coordinates};

use super::WeatherClient;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    api_url: String,
    one_call_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            one_call_url: config.one_call_url.clone(),
            http,
        })
    }

    /// Client for the configured key; errors when no key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = config.require_api_key()?;
        Ok(Self::new(key.to_owned(), config)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T, WeatherError> {
        let res = self
            .http
            .get(url)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather {what} request failed");
            return Err(WeatherError::ServiceError {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("OpenWeather {what} JSON: {e}")))
    }
}

fn coord_params(coords: Coordinates) -> [(&'static str, String); 2] {
    [("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_by_city(&self, city: &str) -> Result<CurrentRaw, WeatherError> {
        let url = format!("{}/weather", self.api_url);
        self.get_json(&url, &[("q", city.to_string())], "current-by-name")
            .await
            .map_err(|err| match err {
                WeatherError::ServiceError { status: 404 } => WeatherError::CityNotFound,
                WeatherError::ServiceError { status: 401 } => WeatherError::AuthError,
                other => other,
            })
    }

    #[instrument(skip(self))]
    async fn current(&self, coords: Coordinates) -> Result<CurrentRaw, WeatherError> {
        let url = format!("{}/weather", self.api_url);
        self.get_json(&url, &coord_params(coords), "current").await
    }

    #[instrument(skip(self))]
    async fn one_call(&self, coords: Coordinates) -> Result<OneCallRaw, WeatherError> {
        let mut params = coord_params(coords).to_vec();
        params.push(("exclude", "minutely,hourly".to_string()));
        self.get_json(&self.one_call_url, &params, "one call").await
    }

    #[instrument(skip(self))]
    async fn five_day(&self, coords: Coordinates) -> Result<FiveDayRaw, WeatherError> {
        let url = format!("{}/forecast", self.api_url);
        self.get_json(&url, &coord_params(coords), "5-day forecast")
            .await
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwSys {
    #[serde(default)]
    pub country: String,
}

/// `GET /weather` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentRaw {
    pub coord: OwCoord,
    pub name: String,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub sys: OwSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallCurrent {
    pub uvi: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallTemp {
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallDaily {
    pub dt: i64,
    pub temp: OneCallTemp,
    pub weather: Vec<OwWeather>,
    #[serde(default)]
    pub pop: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    /// Daily rain volume, mm.
    #[serde(default)]
    pub rain: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallAlert {
    #[serde(default)]
    pub sender_name: Option<String>,
    pub event: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub description: String,
}

/// One Call 3.0 response with `minutely` and `hourly` excluded.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallRaw {
    #[serde(default)]
    pub current: Option<OneCallCurrent>,
    #[serde(default)]
    pub daily: Vec<OneCallDaily>,
    #[serde(default)]
    pub alerts: Vec<OneCallAlert>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiveDayMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiveDayRain {
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiveDayEntry {
    pub dt: i64,
    pub main: FiveDayMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub rain: Option<FiveDayRain>,
}

/// `GET /forecast` response: 3-hour steps, chronologically sorted.
#[derive(Debug, Clone, Deserialize)]
pub struct FiveDayRaw {
    pub list: Vec<FiveDayEntry>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
