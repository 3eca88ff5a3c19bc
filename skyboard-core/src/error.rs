use thiserror::Error;

/// Why a position could not be obtained. Every variant leads to the same
/// default-city fallback; they differ only in what the user is told.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Geolocation is not supported on this platform")]
    CapabilityUnavailable,
    #[error("Location access was denied.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    PositionUnavailable,
    /// The platform itself reported a timeout.
    #[error("Location request timed out.")]
    Timeout,
    /// The platform call neither resolved nor failed before the outer deadline.
    #[error("Location access timed out")]
    DeadlineExceeded,
    #[error("An unknown error occurred.")]
    Unknown(String),
}

/// Errors coming out of the provider HTTP API.
///
/// The `Display` text of the city lookup variants is what the user sees.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,
    #[error("API key error. Please check your API configuration.")]
    AuthError,
    #[error("Weather service error ({status}). Please try again later.")]
    ServiceError { status: u16 },
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Short detail used inside composite messages, e.g. the status code.
    pub fn detail(&self) -> String {
        match self {
            WeatherError::ServiceError { status } => status.to_string(),
            WeatherError::CityNotFound => "404".to_string(),
            WeatherError::AuthError => "401".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_message_carries_status() {
        let err = WeatherError::ServiceError { status: 503 };
        assert_eq!(err.to_string(), "Weather service error (503). Please try again later.");
        assert_eq!(err.detail(), "503");
    }

    #[test]
    fn city_lookup_messages_are_user_facing() {
        assert!(WeatherError::CityNotFound.to_string().starts_with("City not found"));
        assert!(WeatherError::AuthError.to_string().starts_with("API key error"));
    }
}
