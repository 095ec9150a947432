use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One geocoding match, as returned by the suggestion and resolution lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeoCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }

    /// "Name, Country" with the state appended when there is one.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, self.country, state),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// What `resolve_and_fetch` should look up.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTarget {
    /// Free text that still needs geocoding.
    City(String),
    /// Coordinates already known from a selected suggestion or a prior search.
    Coordinates(Coordinates),
}

/// Coarse condition grouping used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    #[default]
    Clear,
    Rain,
    Snow,
    Clouds,
    Mist,
}

impl ConditionKind {
    /// Map the provider's primary condition name. Unknown names fall back to clear.
    pub fn from_main(main: &str) -> Self {
        match main.to_lowercase().as_str() {
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "clouds" => Self::Clouds,
            "mist" => Self::Mist,
            _ => Self::Clear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

/// Current conditions for one location. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    /// Epoch seconds.
    pub sunrise: i64,
    /// Epoch seconds.
    pub sunset: i64,
    pub observation_time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub condition: Condition,
}

impl WeatherSnapshot {
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_mps * 3.6
    }

    pub fn condition_kind(&self) -> ConditionKind {
        ConditionKind::from_main(&self.condition.main)
    }

    /// Strictly between sunrise and sunset; both boundaries count as night.
    pub fn is_daylight_at(&self, now: i64) -> bool {
        now > self.sunrise && now < self.sunset
    }
}

/// Successful outcome of a primary search.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub coordinates: Coordinates,
    pub snapshot: WeatherSnapshot,
}

/// Light/dark display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Unknown theme '{value}'. Expected 'light' or 'dark'.")),
        }
    }
}
