//! Drives a [`ViewState`]: runs the effects the reducer asks for and feeds
//! their outcomes back in as actions, in the order they complete.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::{
    client::LookupClient,
    debounce::Debouncer,
    prefs::{self, PreferenceStore},
    state::{Action, Effect, SearchRequest, ViewState},
};

#[derive(Debug)]
pub struct Session {
    state: ViewState,
    client: LookupClient,
    prefs: Arc<dyn PreferenceStore>,
    debouncer: Debouncer,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
}

impl Session {
    /// Start a session with the theme restored from `prefs`.
    pub fn new(client: LookupClient, prefs: Arc<dyn PreferenceStore>, debounce: Duration) -> Self {
        let theme = prefs::load_theme(prefs.as_ref());
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            state: ViewState::new(theme),
            client,
            prefs,
            debouncer: Debouncer::new(debounce),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Apply `action` and start whatever work it calls for.
    pub fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.state.update(action) {
            self.run(effect);
        }
    }

    /// Wait for the next suggestion or search to complete and apply it.
    pub async fn next_event(&mut self) {
        // The session keeps a sender alive, so the channel never closes.
        if let Some(action) = self.rx.recv().await {
            self.dispatch(action);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleSuggestions(query) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                self.debouncer.schedule(async move {
                    let suggestions = client.fetch_suggestions(&query).await;
                    let _ = tx.send(Action::SuggestionsLoaded(suggestions));
                });
            }
            Effect::CancelSuggestions => self.debouncer.cancel(),
            Effect::Search(SearchRequest { target, label }) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let action = match client.resolve_and_fetch(&target).await {
                        Ok(resolved) => Action::SearchSucceeded { label, resolved },
                        Err(err) => {
                            tracing::warn!(?target, error = %err, "weather search failed");
                            Action::SearchFailed(err.user_message())
                        }
                    };
                    let _ = tx.send(action);
                });
            }
            Effect::PersistTheme(theme) => {
                if let Err(err) = prefs::save_theme(self.prefs.as_ref(), theme) {
                    tracing::warn!(error = %err, %theme, "could not persist theme");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LookupError,
        model::{Condition, Coordinates, GeoCandidate, Theme, WeatherSnapshot},
        prefs::MemoryPreferenceStore,
        provider::WeatherSource,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    /// Knows a fixed set of cities; everything else geocodes to nothing.
    #[derive(Debug, Default)]
    struct FakeSource {
        cities: Vec<GeoCandidate>,
        weather_calls: Mutex<Vec<Coordinates>>,
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, LookupError> {
            Ok(self
                .cities
                .iter()
                .filter(|c| c.name.starts_with(query))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn current_weather(
            &self,
            coordinates: Coordinates,
        ) -> Result<WeatherSnapshot, LookupError> {
            self.weather_calls.lock().push(coordinates);
            let city = self
                .cities
                .iter()
                .find(|c| c.coordinates() == coordinates)
                .ok_or(LookupError::Upstream { status: 400, message: Some("wrong latitude".into()) })?;

            Ok(WeatherSnapshot {
                location_name: city.name.clone(),
                country: city.country.clone(),
                sunrise: 0,
                sunset: i64::MAX,
                observation_time: Utc::now(),
                temperature_c: 20.0,
                feels_like_c: 19.0,
                humidity_pct: 40,
                pressure_hpa: 1020,
                wind_speed_mps: 2.0,
                condition: Condition { main: "Clear".into(), description: "clear sky".into() },
            })
        }
    }

    fn city(name: &str, lat: f64) -> GeoCandidate {
        GeoCandidate { name: name.into(), country: "IT".into(), state: None, lat, lon: 12.0 }
    }

    fn session_with(source: Arc<FakeSource>, prefs: Arc<MemoryPreferenceStore>) -> Session {
        Session::new(LookupClient::new(source), prefs, Duration::from_millis(300))
    }

    fn fake() -> Arc<FakeSource> {
        Arc::new(FakeSource {
            cities: vec![city("Rome", 41.9), city("Rotterdam", 51.9), city("Roanoke", 37.3)],
            ..FakeSource::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn typing_loads_suggestions_after_debounce() {
        let mut session = session_with(fake(), Arc::new(MemoryPreferenceStore::new()));

        session.dispatch(Action::InputChanged("R".into()));
        session.dispatch(Action::InputChanged("Ro".into()));
        session.next_event().await;

        assert_eq!(session.state().suggestions().len(), 3);
        assert_eq!(session.state().visible_suggestions()[0].name, "Rome");
        assert!(!session.state().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_fetches_weather_and_records_history() {
        let mut session = session_with(fake(), Arc::new(MemoryPreferenceStore::new()));

        session.dispatch(Action::InputChanged("Rotterdam".into()));
        session.dispatch(Action::Submit);
        assert!(session.state().is_busy());
        session.next_event().await;

        let state = session.state();
        assert_eq!(state.weather().map(|w| w.location_name.as_str()), Some("Rotterdam"));
        assert_eq!(state.coordinates(), Some(Coordinates { lat: 51.9, lon: 12.0 }));
        assert_eq!(state.history().get(0), Some("Rotterdam"));
        assert_eq!(state.input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_city_surfaces_not_found_and_clears_weather() {
        let mut session = session_with(fake(), Arc::new(MemoryPreferenceStore::new()));

        session.dispatch(Action::InputChanged("Rome".into()));
        session.dispatch(Action::Submit);
        session.next_event().await;
        assert!(session.state().weather().is_some());

        session.dispatch(Action::InputChanged("Qxzzy123".into()));
        session.dispatch(Action::Submit);
        session.next_event().await;

        assert!(session.state().weather().is_none());
        assert_eq!(session.state().error(), Some("Could not locate that city."));
        assert_eq!(session.state().history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_a_suggestion_skips_geocoding() {
        let source = fake();
        let mut session = session_with(source.clone(), Arc::new(MemoryPreferenceStore::new()));

        session.dispatch(Action::InputChanged("Ro".into()));
        session.next_event().await;
        session.dispatch(Action::HighlightDown);
        session.dispatch(Action::HighlightDown);
        session.dispatch(Action::Enter);
        session.next_event().await;

        assert_eq!(session.state().history().get(0), Some("Rotterdam"));
        assert_eq!(*source.weather_calls.lock(), vec![Coordinates { lat: 51.9, lon: 12.0 }]);
    }

    #[tokio::test(start_paused = true)]
    async fn theme_toggle_persists_and_restores() {
        let prefs = Arc::new(MemoryPreferenceStore::new());

        let mut session = session_with(fake(), prefs.clone());
        assert_eq!(session.state().theme(), Theme::Light);
        session.dispatch(Action::ToggleTheme);
        drop(session);

        let mut reloaded = session_with(fake(), prefs.clone());
        assert_eq!(reloaded.state().theme(), Theme::Dark);

        reloaded.dispatch(Action::ToggleTheme);
        assert_eq!(prefs.get(crate::prefs::THEME_KEY).unwrap().as_deref(), Some("light"));
    }
}
