use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::{
    error::{LocationError, WeatherError},
    model::Coordinates,
    provider::WeatherClient,
};

/// Hints passed to the platform position service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    /// Deadline the platform is asked to honour itself.
    pub timeout: Duration,
    /// How old a cached position may be.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(8),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

/// Outer deadline covering platforms that hang instead of failing.
pub const RESOLVE_DEADLINE: Duration = Duration::from_secs(10);

/// Platform position capability.
#[async_trait]
pub trait Geolocator: Send + Sync {
    fn is_available(&self) -> bool;

    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// Platform without any position service, e.g. a plain terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::CapabilityUnavailable)
    }
}

/// Position supplied up front, e.g. from command-line arguments.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geolocator: G,
    options: GeolocationOptions,
    deadline: Duration,
}

impl<G: Geolocator> LocationResolver<G> {
    pub fn new(geolocator: G) -> Self {
        Self {
            geolocator,
            options: GeolocationOptions::default(),
            deadline: RESOLVE_DEADLINE,
        }
    }

    /// Asks the platform for the current position.
    ///
    /// Fails straight away with [`LocationError::CapabilityUnavailable`] when
    /// there is no position service, and with
    /// [`LocationError::DeadlineExceeded`] when the platform call outlives
    /// [`RESOLVE_DEADLINE`].
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Result<Coordinates, LocationError> {
        if !self.geolocator.is_available() {
            info!("geolocation is not supported");
            return Err(LocationError::CapabilityUnavailable);
        }

        let attempt = self.geolocator.current_position(&self.options);
        match tokio::time::timeout(self.deadline, attempt).await {
            Ok(Ok(coords)) => {
                debug!(lat = coords.lat, lon = coords.lon, "location obtained");
                Ok(coords)
            }
            Ok(Err(err)) => {
                info!(error = %err, "geolocation failed");
                Err(err)
            }
            Err(_) => {
                info!(deadline = ?self.deadline, "geolocation did not answer in time");
                Err(LocationError::DeadlineExceeded)
            }
        }
    }
}

/// Forward geocode through the current-weather-by-name endpoint; the
/// coordinates embedded in that response are the answer.
#[instrument(skip(client))]
pub async fn resolve_by_city_name<C: WeatherClient + ?Sized>(
    client: &C,
    name: &str,
) -> Result<Coordinates, WeatherError> {
    let raw = client.current_by_city(name).await?;
    Ok(Coordinates::new(raw.coord.lat, raw.coord.lon))
}
