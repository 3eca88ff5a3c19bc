use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use crossterm::{style::force_color_output, tty::IsTty};
use skyboard_core::{
    Config, Coordinates, Dashboard, FixedPosition, LocationResolver, NoGeolocation,
    NotificationKind, OpenWeatherClient, PreferenceStore, ThemeSetting,
};
use tracing::debug;

use crate::render::{self, Palette};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the default city.
    Configure,

    /// Show current conditions, the 7-day forecast, charts and alerts.
    Show {
        /// City to search for. Without it the position or default city is used.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude of the position to show.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the position to show.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show or toggle the colour theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                show(city, position).await
            }
            Command::Theme { action } => theme(action.unwrap_or(ThemeAction::Show)),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key);

    let city = inquire::Text::new("Default city:")
        .with_default(&cfg.default_city)
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        cfg.default_city = city.trim().to_string();
    }

    cfg.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>, position: Option<Coordinates>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let client = OpenWeatherClient::from_config(&cfg)?;
    let theme = ThemeSetting::load(PreferenceStore::open_default()?)?;
    let palette = Palette::for_theme(theme.current());
    if !std::io::stdout().is_tty() {
        force_color_output(false);
    }

    let mut dash = Dashboard::new(client, cfg.default_city.clone());

    let notes = match (city, position) {
        (Some(city), _) => vec![dash.search(&city).await],
        (None, Some(coords)) => dash.locate(&LocationResolver::new(FixedPosition(coords))).await,
        (None, None) => dash.locate(&LocationResolver::new(NoGeolocation)).await,
    };

    for note in &notes {
        eprintln!("{}", render::notification(note, &palette));
    }

    match dash.snapshot() {
        Some(snapshot) => {
            debug!(theme = %theme.current(), "rendering dashboard");
            print!("{}", render::dashboard(snapshot, &cfg.icon_base_url, &palette)?);
            Ok(())
        }
        None => {
            let reason = notes
                .iter()
                .rev()
                .find(|n| n.kind == NotificationKind::Error)
                .map(|n| n.message.clone())
                .unwrap_or_else(|| "No weather data available".to_string());
            bail!(reason)
        }
    }
}

fn theme(action: ThemeAction) -> anyhow::Result<()> {
    let mut setting = ThemeSetting::load(PreferenceStore::open_default()?)?;

    let current = match action {
        ThemeAction::Show => setting.current(),
        ThemeAction::Toggle => setting.toggle()?,
    };

    println!("{current}");
    Ok(())
}
