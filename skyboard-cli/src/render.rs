//! Text rendering of a dashboard snapshot.

use std::fmt::{self, Write};

use chrono::Local;
use crossterm::style::{Color, Stylize, style};
use skyboard_core::{
    Notification, NotificationKind, Snapshot, Theme,
    display::{self, capitalize, metres_to_km, mps_to_kmh},
};

/// Terminal colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub heading: Color,
    pub warm: Color,
    pub cool: Color,
    pub muted: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                heading: Color::DarkBlue,
                warm: Color::DarkYellow,
                cool: Color::DarkBlue,
                muted: Color::DarkGrey,
                success: Color::DarkGreen,
                error: Color::DarkRed,
                warning: Color::DarkYellow,
                info: Color::DarkBlue,
            },
            Theme::Dark => Self {
                heading: Color::Cyan,
                warm: Color::Yellow,
                cool: Color::Blue,
                muted: Color::Grey,
                success: Color::Green,
                error: Color::Red,
                warning: Color::Yellow,
                info: Color::Cyan,
            },
        }
    }

    fn for_kind(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Warning => self.warning,
            NotificationKind::Info => self.info,
        }
    }
}

pub fn notification(note: &Notification, palette: &Palette) -> String {
    let colour = palette.for_kind(note.kind);
    note.message.as_str().with(colour).to_string()
}

fn bar(value: f64, scale: f64) -> String {
    let cells = (value.max(0.0) / scale).round() as usize;
    "█".repeat(cells.min(40))
}

pub fn dashboard(
    snapshot: &Snapshot,
    icon_base: &str,
    palette: &Palette,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, snapshot, icon_base, palette)?;
    Ok(out)
}

fn write_dashboard(
    out: &mut String,
    snapshot: &Snapshot,
    icon_base: &str,
    p: &Palette,
) -> fmt::Result {
    let current = &snapshot.current;
    let daily = snapshot.daily();

    let place = format!("{}, {}", current.location_name, current.country);
    writeln!(
        out,
        "{}  {}",
        place.with(p.heading).bold(),
        Local::now().format("%A, %B %-d, %Y")
    )?;
    let updated = snapshot.fetched_at.with_timezone(&Local).format("%H:%M");
    writeln!(out, "{}", style(format!("Updated {updated}")).with(p.muted))?;
    writeln!(
        out,
        "{}  {}",
        style(format!("{}°C", current.temperature_c.round())).with(p.warm),
        capitalize(&current.description)
    )?;
    let icon = display::icon_url(icon_base, &current.icon);
    writeln!(out, "{}", icon.with(p.muted))?;
    writeln!(out, "  Feels like  {}°C", current.feels_like_c.round())?;
    writeln!(out, "  Humidity    {}%", current.humidity_pct)?;
    let wind_kmh = mps_to_kmh(current.wind_speed_mps);
    writeln!(out, "  Wind        {wind_kmh} km/h")?;
    writeln!(out, "  Pressure    {} hPa", current.pressure_hpa)?;
    if let Some(visibility) = current.visibility_m {
        writeln!(out, "  Visibility  {} km", metres_to_km(visibility))?;
    }
    if let Some(uv) = current.uv_index {
        writeln!(out, "  UV index    {}", uv.round())?;
    }

    writeln!(
        out,
        "\n{} {}",
        "7-day forecast".with(p.heading).bold(),
        style(format!("({})", snapshot.forecast.source)).with(p.muted)
    )?;
    let labels = display::day_labels(daily, &Local);
    for (label, day) in labels.iter().zip(daily) {
        writeln!(
            out,
            "  {label:<6} {} {}  {:<8} 💧 {:>3}%  {}",
            style(format!("{:>4}°", day.temp.max.round())).with(p.warm),
            style(format!("{:>4}°", day.temp.min.round())).with(p.cool),
            day.condition.main,
            (day.pop * 100.0).round(),
            display::icon_url(icon_base, &day.condition.icon).with(p.muted)
        )?;
    }

    let temps = display::temperature_series(daily, &Local);
    writeln!(out, "\n{}", "Temperature (°C)".with(p.heading).bold())?;
    for ((label, max), min) in temps.labels.iter().zip(&temps.max).zip(&temps.min) {
        writeln!(
            out,
            "  {label:<6} {:>7} {}",
            format!("{min}..{max}"),
            bar(*max as f64, 2.0).with(p.warm)
        )?;
    }

    let rain = display::precipitation_series(daily, &Local);
    let title = "Precipitation (mm / chance %)";
    writeln!(out, "\n{}", title.with(p.heading).bold())?;
    for ((label, mm), pct) in rain.labels.iter().zip(&rain.volume_mm).zip(&rain.chance_pct) {
        writeln!(
            out,
            "  {label:<6} {mm:>5.1} mm {pct:>4.0}% {}",
            bar(*pct, 5.0).with(p.cool)
        )?;
    }

    let wind = display::wind_series(daily, &Local);
    writeln!(out, "\n{}", "Wind (km/h)".with(p.heading).bold())?;
    for ((label, speed), gust) in wind.labels.iter().zip(&wind.speed_kmh).zip(&wind.gust_kmh) {
        writeln!(
            out,
            "  {label:<6} {speed:>3} gust {gust:>3} {}",
            bar(*speed as f64, 2.0).with(p.success)
        )?;
    }

    writeln!(out, "\n{}", "Alerts".with(p.heading).bold())?;
    for alert in &snapshot.alerts {
        let tier = alert
            .severity
            .map(|s| format!(" [{}]", s.as_str()))
            .unwrap_or_default();
        writeln!(out, "  {}{}", alert.title, tier)?;
        writeln!(out, "    {}", alert.description)?;
        writeln!(
            out,
            "    {}",
            display::format_alert_time(&alert.time, &Local).with(p.muted)
        )?;
    }

    Ok(())
}
