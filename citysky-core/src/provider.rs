use crate::{
    Config,
    error::LookupError,
    model::{Coordinates, GeoCandidate, WeatherSnapshot},
    provider::openweather::OpenWeatherSource,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The two upstream calls everything else is built on.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Resolve free text to at most `limit` candidates, best match first.
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, LookupError>;

    /// Current conditions at `coordinates`, in metric units.
    async fn current_weather(&self, coordinates: Coordinates)
    -> Result<WeatherSnapshot, LookupError>;
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherSource>> {
    let api_key = config.api_key()?;

    let source = OpenWeatherSource::new(api_key)
        .with_endpoints(config.geocoding_url.clone(), config.weather_url.clone());

    Ok(Arc::new(source))
}
