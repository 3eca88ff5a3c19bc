//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - Configuration and the persisted theme preference
//! - The OpenWeather client and the location resolver
//! - Normalization of the three forecast shapes into one daily model
//! - The dashboard session that runs update cycles
//!
//! It is used by `skyboard-cli`, but any renderer can consume [`Snapshot`].

pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod synthetic;
pub mod theme;
pub mod tiers;

pub use config::Config;
pub use dashboard::{Dashboard, Notification, NotificationKind, UpdateError};
pub use error::{LocationError, WeatherError};
pub use location::{FixedPosition, Geolocator, LocationResolver, NoGeolocation};
pub use model::{
    Alert, AlertProvenance, AlertTime, Coordinates, CurrentConditions, DailyForecast, Forecast,
    ForecastSource, Severity, Snapshot,
};
pub use provider::{WeatherClient, openweather::OpenWeatherClient};
pub use theme::{PreferenceStore, Theme, ThemeSetting};
