use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::{DEFAULT_GEOCODING_URL, DEFAULT_WEATHER_URL},
    error::LookupError,
    model::{Condition, Coordinates, GeoCandidate, WeatherSnapshot},
};

use super::WeatherSource;

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    geocoding_url: String,
    weather_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the source at different endpoints (a proxy, or a mock server in tests).
    pub fn with_endpoints(mut self, geocoding_url: String, weather_url: String) -> Self {
        self.geocoding_url = geocoding_url;
        self.weather_url = weather_url;
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

/// Error body shape shared by both endpoints, e.g. `{"cod":401,"message":"Invalid API key"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, LookupError> {
        tracing::debug!(query, limit, "geocoding request");

        let res = self
            .http
            .get(&self.geocoding_url)
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let entries: Vec<OwGeoEntry> = read_json(res).await?;

        Ok(entries
            .into_iter()
            .map(|e| GeoCandidate {
                name: e.name,
                country: e.country,
                state: e.state,
                lat: e.lat,
                lon: e.lon,
            })
            .collect())
    }

    async fn current_weather(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, LookupError> {
        tracing::debug!(lat = coordinates.lat, lon = coordinates.lon, "current weather request");

        let res = self
            .http
            .get(&self.weather_url)
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let parsed: OwCurrentResponse = read_json(res).await?;

        let observation_time = DateTime::<Utc>::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| Condition { main: w.main, description: w.description })
            .unwrap_or_else(|| Condition {
                main: "Unknown".to_string(),
                description: "unknown".to_string(),
            });

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            country: parsed.sys.country,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            observation_time,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            condition,
        })
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, LookupError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        tracing::debug!(%status, body = %truncate_body(&body), "OpenWeather request failed");
        let message = serde_json::from_str::<OwErrorBody>(&body).ok().and_then(|b| b.message);
        return Err(LookupError::Upstream { status: status.as_u16(), message });
    }

    Ok(serde_json::from_str(&body)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
