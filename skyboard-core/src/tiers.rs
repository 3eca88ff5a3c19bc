//! Ordered forecast sources tried until one answers.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Coordinates, Forecast},
    normalize,
    provider::WeatherClient,
};

/// One way of obtaining a normalized forecast.
#[async_trait]
pub trait ForecastTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, coords: Coordinates) -> Result<Forecast, WeatherError>;
}

/// One Call endpoint, used as-is.
#[derive(Debug)]
pub struct OneCallTier<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: WeatherClient + ?Sized> OneCallTier<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: WeatherClient + ?Sized> ForecastTier for OneCallTier<'_, C> {
    fn name(&self) -> &'static str {
        "one call"
    }

    async fn attempt(&self, coords: Coordinates) -> Result<Forecast, WeatherError> {
        let raw = self.client.one_call(coords).await?;
        Ok(normalize::from_one_call(raw))
    }
}

/// 5-day/3-hour endpoint, aggregated into days of the given timezone.
#[derive(Debug)]
pub struct FiveDayTier<'a, C: ?Sized, Tz = Local> {
    client: &'a C,
    tz: Tz,
}

impl<'a, C: WeatherClient + ?Sized> FiveDayTier<'a, C, Local> {
    pub fn new(client: &'a C) -> Self {
        Self { client, tz: Local }
    }
}

impl<'a, C: WeatherClient + ?Sized, Tz: TimeZone> FiveDayTier<'a, C, Tz> {
    pub fn with_timezone(client: &'a C, tz: Tz) -> Self {
        Self { client, tz }
    }
}

#[async_trait]
impl<C, Tz> ForecastTier for FiveDayTier<'_, C, Tz>
where
    C: WeatherClient + ?Sized,
    Tz: TimeZone + Send + Sync,
{
    fn name(&self) -> &'static str {
        "5-day aggregate"
    }

    async fn attempt(&self, coords: Coordinates) -> Result<Forecast, WeatherError> {
        let raw = self.client.five_day(coords).await?;
        Ok(normalize::aggregate_five_day(&raw, &self.tz))
    }
}

/// Runs `tiers` in order and returns the first forecast obtained. Later tiers
/// are not touched once one succeeds. Failures are logged, never returned.
pub async fn first_success(tiers: &[&dyn ForecastTier], coords: Coordinates) -> Option<Forecast> {
    for tier in tiers {
        match tier.attempt(coords).await {
            Ok(forecast) => {
                debug!(tier = tier.name(), days = forecast.daily.len(), "forecast tier succeeded");
                return Some(forecast);
            }
            Err(err) => {
                warn!(tier = tier.name(), error = %err, "forecast tier failed, trying next")
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        name: &'static str,
        result: Option<ForecastSource>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, result: Option<ForecastSource>) -> Self {
            Self {
                name,
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ForecastTier for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, _coords: Coordinates) -> Result<Forecast, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Some(source) => Ok(Forecast {
                    source,
                    current_uvi: None,
                    daily: Vec::new(),
                    alerts: Vec::new(),
                }),
                None => Err(WeatherError::ServiceError { status: 401 }),
            }
        }
    }

    fn here() -> Coordinates {
        Coordinates::new(6.93, 79.85)
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let first = Scripted::new("first", Some(ForecastSource::OneCall));
        let second = Scripted::new("second", Some(ForecastSource::FiveDayAggregate));

        let chain: [&dyn ForecastTier; 2] = [&first, &second];
        let found = first_success(&chain, here()).await;

        assert_eq!(found.map(|f| f.source), Some(ForecastSource::OneCall));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_failures_in_order() {
        let first = Scripted::new("first", None);
        let second = Scripted::new("second", Some(ForecastSource::FiveDayAggregate));

        let chain: [&dyn ForecastTier; 2] = [&first, &second];
        let found = first_success(&chain, here()).await;

        assert_eq!(found.map(|f| f.source), Some(ForecastSource::FiveDayAggregate));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn none_when_every_tier_fails() {
        let first = Scripted::new("first", None);
        let second = Scripted::new("second", None);

        let chain: [&dyn ForecastTier; 2] = [&first, &second];
        assert!(first_success(&chain, here()).await.is_none());
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }
}
