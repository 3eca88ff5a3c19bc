use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::Coordinates,
    provider::openweather::{CurrentRaw, FiveDayRaw, OneCallRaw},
};

pub mod openweather;

/// Provider-native access to the four endpoint families the dashboard uses.
/// Nothing here is normalized yet.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Current weather by city name. Doubles as the forward geocoder.
    async fn current_by_city(&self, city: &str) -> Result<CurrentRaw, WeatherError>;

    async fn current(&self, coords: Coordinates) -> Result<CurrentRaw, WeatherError>;

    /// Daily forecast with UV index and alerts.
    async fn one_call(&self, coords: Coordinates) -> Result<OneCallRaw, WeatherError>;

    /// 3-hour steps over five days.
    async fn five_day(&self, coords: Coordinates) -> Result<FiveDayRaw, WeatherError>;
}

#[async_trait]
impl<C: WeatherClient + ?Sized> WeatherClient for &C {
    async fn current_by_city(&self, city: &str) -> Result<CurrentRaw, WeatherError> {
        (**self).current_by_city(city).await
    }

    async fn current(&self, coords: Coordinates) -> Result<CurrentRaw, WeatherError> {
        (**self).current(coords).await
    }

    async fn one_call(&self, coords: Coordinates) -> Result<OneCallRaw, WeatherError> {
        (**self).one_call(coords).await
    }

    async fn five_day(&self, coords: Coordinates) -> Result<FiveDayRaw, WeatherError> {
        (**self).five_day(coords).await
    }
}
