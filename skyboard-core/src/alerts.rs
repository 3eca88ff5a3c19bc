use chrono::DateTime;

use crate::model::{Alert, AlertProvenance, AlertTime, ProviderAlert, Severity};

/// Most alerts the panel shows.
pub const MAX_ALERTS: usize = 5;

const ADVISORIES: [(&str, &str, &str, Severity); 5] = [
    (
        "Weather Update",
        "Partly cloudy conditions expected throughout the day with mild temperatures.",
        "Updated 2 hours ago",
        Severity::Minor,
    ),
    (
        "UV Index Advisory",
        "UV levels will be moderate today. Consider wearing sunscreen if spending extended time outdoors.",
        "Updated 3 hours ago",
        Severity::Moderate,
    ),
    (
        "Temperature Notice",
        "Temperatures expected to drop by 5°C tomorrow evening. Dress warmly for outdoor activities.",
        "Updated 4 hours ago",
        Severity::Minor,
    ),
    (
        "Wind Advisory",
        "Gentle breeze conditions expected. Good weather for outdoor activities and sports.",
        "Updated 5 hours ago",
        Severity::Minor,
    ),
    (
        "Weekly Outlook",
        "Generally pleasant weather expected for the week ahead with occasional cloud cover.",
        "Updated 6 hours ago",
        Severity::Minor,
    ),
];

/// Illustrative advisories shown when the provider sent no alerts.
pub fn canned_advisories() -> Vec<Alert> {
    ADVISORIES
        .iter()
        .map(|(title, description, time, severity)| Alert {
            title: (*title).to_string(),
            description: (*description).to_string(),
            time: AlertTime::Freeform((*time).to_string()),
            severity: Some(*severity),
            provenance: AlertProvenance::Synthetic,
        })
        .collect()
}

fn from_provider(alert: &ProviderAlert) -> Alert {
    let time = match (
        DateTime::from_timestamp(alert.start, 0),
        DateTime::from_timestamp(alert.end, 0),
    ) {
        (Some(start), Some(end)) => AlertTime::Range { start, end },
        _ => AlertTime::Freeform(format!("{} - {}", alert.start, alert.end)),
    };

    Alert {
        title: alert.event.clone(),
        description: alert.description.clone(),
        time,
        severity: None,
        provenance: AlertProvenance::Real,
    }
}

/// Up to [`MAX_ALERTS`] provider alerts verbatim, or the canned set when
/// there are none.
pub fn select(provider_alerts: &[ProviderAlert]) -> Vec<Alert> {
    if provider_alerts.is_empty() {
        return canned_advisories();
    }

    provider_alerts
        .iter()
        .take(MAX_ALERTS)
        .map(from_provider)
        .collect()
}
