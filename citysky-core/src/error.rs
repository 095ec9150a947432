//! Errors raised by the geocode/weather lookups.

use thiserror::Error;

/// Shown whenever no better message is available.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong...";

/// Shown when geocoding resolves a city name to zero candidates.
pub const CITY_NOT_FOUND_MESSAGE: &str = "Could not locate that city.";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Could not locate that city.")]
    CityNotFound,

    #[error("Upstream request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LookupError {
    /// The single message surfaced to the user. A server-supplied message wins
    /// over the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound => CITY_NOT_FOUND_MESSAGE.to_string(),
            Self::Upstream { message: Some(msg), .. } if !msg.trim().is_empty() => msg.clone(),
            Self::Upstream { .. } | Self::Network(_) | Self::Decode(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_has_its_own_message() {
        assert_eq!(LookupError::CityNotFound.user_message(), "Could not locate that city.");
    }

    #[test]
    fn server_message_is_preferred() {
        let err = LookupError::Upstream { status: 401, message: Some("Invalid API key".into()) };
        assert_eq!(err.user_message(), "Invalid API key");
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn missing_or_blank_server_message_falls_back() {
        let err = LookupError::Upstream { status: 502, message: None };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = LookupError::Upstream { status: 502, message: Some("  ".into()) };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn decode_errors_fall_back() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(LookupError::from(json_err).user_message(), GENERIC_ERROR_MESSAGE);
    }
}
