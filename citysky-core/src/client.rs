//! Request orchestration on top of a [`WeatherSource`].

use std::sync::Arc;

use crate::{
    error::LookupError,
    model::{GeoCandidate, Resolved, SearchTarget},
    provider::WeatherSource,
};

/// Candidates requested for typeahead.
pub const SUGGESTION_LIMIT: u8 = 5;
/// Candidates requested when resolving a submitted city name.
pub const RESOLVE_LIMIT: u8 = 1;

#[derive(Debug, Clone)]
pub struct LookupClient {
    source: Arc<dyn WeatherSource>,
}

impl LookupClient {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Best-effort typeahead. Any failure yields an empty list.
    pub async fn fetch_suggestions(&self, query: &str) -> Vec<GeoCandidate> {
        match self.source.geocode(query, SUGGESTION_LIMIT).await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::debug!(query, error = %err, "suggestion lookup failed, clearing list");
                Vec::new()
            }
        }
    }

    /// Geocode `target` if needed, then fetch current weather for it.
    pub async fn resolve_and_fetch(&self, target: &SearchTarget) -> Result<Resolved, LookupError> {
        let coordinates = match target {
            SearchTarget::Coordinates(coords) => *coords,
            SearchTarget::City(query) => self
                .source
                .geocode(query, RESOLVE_LIMIT)
                .await?
                .first()
                .map(GeoCandidate::coordinates)
                .ok_or(LookupError::CityNotFound)?,
        };

        let snapshot = self.source.current_weather(coordinates).await?;

        Ok(Resolved { coordinates, snapshot })
    }
}
