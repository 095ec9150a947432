//! Core library for the `citysky` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The geocode/weather source abstraction and its OpenWeather implementation
//! - The lookup client (typeahead suggestions, resolve-then-fetch)
//! - The view state reducer, input debouncer and session runtime
//! - Persisted preferences (theme)
//!
//! It is used by `citysky-cli`, but the state and session types carry no
//! rendering assumptions and can drive any front-end.

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod history;
pub mod model;
pub mod prefs;
pub mod provider;
pub mod session;
pub mod state;

pub use client::LookupClient;
pub use config::Config;
pub use debounce::Debouncer;
pub use error::LookupError;
pub use history::SearchHistory;
pub use model::{
    ConditionKind, Coordinates, GeoCandidate, Resolved, SearchTarget, Theme, WeatherSnapshot,
};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use provider::WeatherSource;
pub use session::Session;
pub use state::{Action, Effect, ViewState};
