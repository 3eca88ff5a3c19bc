//! One dashboard session: runs update cycles and holds the last snapshot
//! that was applied.

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    alerts,
    error::{LocationError, WeatherError},
    location::{self, Geolocator, LocationResolver},
    model::{Coordinates, Forecast, Snapshot},
    normalize,
    provider::WeatherClient,
    synthetic,
    tiers::{self, FiveDayTier, ForecastTier, OneCallTier},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Transient status line for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failures that end an update cycle. Forecast problems never do.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    City(WeatherError),
    #[error("Error: Failed to fetch current weather ({})", .0.detail())]
    Current(WeatherError),
}

/// What the user is told before the default city is loaded instead.
pub fn fallback_notice(err: &LocationError) -> Notification {
    match err {
        LocationError::CapabilityUnavailable => Notification::new(
            NotificationKind::Info,
            "Geolocation not supported. Loading default location...",
        ),
        LocationError::DeadlineExceeded => Notification::new(
            NotificationKind::Info,
            "Location access timed out. Loading default location...",
        ),
        other => Notification::new(
            NotificationKind::Warning,
            format!("Unable to get your location. {other} Loading default location..."),
        ),
    }
}

#[derive(Debug)]
pub struct Dashboard<C> {
    client: C,
    default_city: String,
    rng: Mutex<StdRng>,
    snapshot: Option<Snapshot>,
}

impl<C: WeatherClient> Dashboard<C> {
    pub fn new(client: C, default_city: impl Into<String>) -> Self {
        Self {
            client,
            default_city: default_city.into(),
            rng: Mutex::new(StdRng::from_os_rng()),
            snapshot: None,
        }
    }

    /// Replaces the random source behind the synthetic forecast.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Last successfully applied update, if any.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn apply(&mut self, snapshot: Snapshot) {
        info!(
            location = %snapshot.current.location_name,
            source = %snapshot.forecast.source,
            days = snapshot.forecast.daily.len(),
            "applying weather snapshot"
        );
        self.snapshot = Some(snapshot);
    }

    fn synthetic_forecast(&self, base_temp_c: Option<f64>) -> Forecast {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        synthetic::generate(&mut *rng, base_temp_c, Utc::now())
    }

    /// Builds a complete snapshot without touching the applied one.
    ///
    /// Current conditions are fetched first; if that fails no forecast
    /// endpoint is contacted.
    #[instrument(skip(self))]
    pub async fn fetch_by_coords(&self, coords: Coordinates) -> Result<Snapshot, UpdateError> {
        let raw_current = self
            .client
            .current(coords)
            .await
            .map_err(UpdateError::Current)?;

        let one_call = OneCallTier::new(&self.client);
        let five_day = FiveDayTier::new(&self.client);
        let chain: [&dyn ForecastTier; 2] = [&one_call, &five_day];

        let forecast = match tiers::first_success(&chain, coords).await {
            Some(forecast) => forecast,
            None => {
                warn!("no forecast endpoint answered, using synthetic forecast");
                self.synthetic_forecast(Some(raw_current.main.temp))
            }
        };

        let current = normalize::current_conditions(&raw_current, forecast.current_uvi);
        let alerts = alerts::select(&forecast.alerts);

        Ok(Snapshot {
            coordinates: coords,
            current,
            forecast,
            alerts,
            fetched_at: Utc::now(),
        })
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_city(&self, city: &str) -> Result<Snapshot, UpdateError> {
        let coords = location::resolve_by_city_name(&self.client, city)
            .await
            .map_err(UpdateError::City)?;
        self.fetch_by_coords(coords).await
    }

    fn finish(&mut self, result: Result<Snapshot, UpdateError>) -> Notification {
        match result {
            Ok(snapshot) => {
                self.apply(snapshot);
                Notification::new(NotificationKind::Success, "Weather data updated successfully!")
            }
            Err(err) => {
                warn!(error = %err, "weather update failed");
                Notification::new(NotificationKind::Error, err.to_string())
            }
        }
    }

    pub async fn show_coords(&mut self, coords: Coordinates) -> Notification {
        let result = self.fetch_by_coords(coords).await;
        self.finish(result)
    }

    async fn show_city(&mut self, city: &str) -> Notification {
        let result = self.fetch_by_city(city).await;
        self.finish(result)
    }

    /// City search. A blank query is rejected without any request.
    pub async fn search(&mut self, query: &str) -> Notification {
        let city = query.trim();
        if city.is_empty() {
            return Notification::new(NotificationKind::Warning, "Please enter a city name");
        }
        self.show_city(city).await
    }

    /// Weather for the platform position, or for the default city when the
    /// position cannot be had for any reason.
    pub async fn locate<G: Geolocator>(
        &mut self,
        resolver: &LocationResolver<G>,
    ) -> Vec<Notification> {
        match resolver.resolve().await {
            Ok(coords) => vec![self.show_coords(coords).await],
            Err(err) => {
                let notice = fallback_notice(&err);
                let city = self.default_city.clone();
                vec![notice, self.show_city(&city).await]
            }
        }
    }
}
