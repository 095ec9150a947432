//! The view state and its reducer.
//!
//! [`ViewState::update`] is the only way state changes. It performs no I/O:
//! anything that has to reach the network or the preference store is returned
//! as an [`Effect`] for the caller to run, and the outcome comes back in as
//! another [`Action`].

use crate::{
    history::SearchHistory,
    model::{Coordinates, GeoCandidate, Resolved, SearchTarget, Theme, WeatherSnapshot},
};

/// Everything that can happen to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InputChanged(String),
    SuggestionsLoaded(Vec<GeoCandidate>),
    FocusSuggestions,
    CloseSuggestions,
    HighlightDown,
    HighlightUp,
    Highlight(usize),
    Enter,
    SelectSuggestion(usize),
    Submit,
    SearchSucceeded { label: String, resolved: Resolved },
    SearchFailed(String),
    RecallHistory(usize),
    Reset,
    ToggleTheme,
}

/// A primary search the reducer wants run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub target: SearchTarget,
    /// Recorded in history if the search succeeds.
    pub label: String,
}

/// Side effects declared by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Debounce, then look up suggestions for this text.
    ScheduleSuggestions(String),
    /// Drop any pending suggestion lookup.
    CancelSuggestions,
    Search(SearchRequest),
    PersistTheme(Theme),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    input: String,
    suggestions: Vec<GeoCandidate>,
    suggestions_open: bool,
    /// `None` means nothing highlighted (index -1).
    highlighted: Option<usize>,
    coordinates: Option<Coordinates>,
    weather: Option<WeatherSnapshot>,
    error: Option<String>,
    history: SearchHistory,
    theme: Theme,
    busy: bool,
}

impl ViewState {
    pub fn new(theme: Theme) -> Self {
        Self { theme, ..Self::default() }
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::InputChanged(text) => self.set_input(text),
            Action::SuggestionsLoaded(list) => {
                self.suggestions = list;
                self.suggestions_open = true;
                self.highlighted = None;
                None
            }
            Action::FocusSuggestions => {
                self.suggestions_open = true;
                None
            }
            Action::CloseSuggestions => {
                self.suggestions_open = false;
                None
            }
            Action::HighlightDown => {
                if self.navigable() {
                    let last = self.suggestions.len() - 1;
                    self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1).min(last)));
                }
                None
            }
            Action::HighlightUp => {
                if self.navigable() {
                    self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
                }
                None
            }
            Action::Highlight(index) => {
                if self.navigable() && index < self.suggestions.len() {
                    self.highlighted = Some(index);
                }
                None
            }
            Action::Enter => match self.highlighted {
                Some(index) if self.navigable() => self.select(index),
                _ => self.submit(),
            },
            Action::SelectSuggestion(index) => self.select(index),
            Action::Submit => self.submit(),
            Action::SearchSucceeded { label, resolved } => {
                self.weather = Some(resolved.snapshot);
                self.coordinates = Some(resolved.coordinates);
                self.error = None;
                self.history.record(&label);
                self.input.clear();
                self.busy = false;
                None
            }
            Action::SearchFailed(message) => {
                self.weather = None;
                self.error = Some(message);
                self.busy = false;
                None
            }
            Action::RecallHistory(index) => {
                let entry = self.history.get(index)?.to_string();
                self.set_input(entry)
            }
            Action::Reset => {
                self.input.clear();
                self.suggestions.clear();
                self.suggestions_open = false;
                self.highlighted = None;
                self.coordinates = None;
                self.weather = None;
                self.error = None;
                self.history.clear();
                Some(Effect::CancelSuggestions)
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                Some(Effect::PersistTheme(self.theme))
            }
        }
    }

    fn set_input(&mut self, text: String) -> Option<Effect> {
        self.input = text;
        self.suggestions_open = true;

        if self.input.trim().is_empty() {
            Some(Effect::CancelSuggestions)
        } else {
            Some(Effect::ScheduleSuggestions(self.input.clone()))
        }
    }

    fn navigable(&self) -> bool {
        self.suggestions_open && !self.suggestions.is_empty()
    }

    fn select(&mut self, index: usize) -> Option<Effect> {
        if self.busy {
            return None;
        }

        let candidate = self.suggestions.get(index)?.clone();

        self.input = candidate.name.clone();
        self.coordinates = Some(candidate.coordinates());
        self.begin_search(SearchRequest {
            target: SearchTarget::Coordinates(candidate.coordinates()),
            label: candidate.name,
        })
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.busy {
            return None;
        }

        let (target, label) = if !self.input.trim().is_empty() {
            (SearchTarget::City(self.input.clone()), self.input.clone())
        } else {
            (SearchTarget::Coordinates(self.coordinates?), String::new())
        };

        self.begin_search(SearchRequest { target, label })
    }

    fn begin_search(&mut self, request: SearchRequest) -> Option<Effect> {
        self.busy = true;
        self.error = None;
        self.suggestions_open = false;
        self.highlighted = None;
        Some(Effect::Search(request))
    }

    /// Day unless a snapshot says the sun is down at `now` (epoch seconds).
    pub fn is_daylight(&self, now: i64) -> bool {
        self.weather.as_ref().is_none_or(|w| w.is_daylight_at(now))
    }

    pub fn can_submit(&self) -> bool {
        !self.busy
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[GeoCandidate] {
        &self.suggestions
    }

    /// Suggestions worth showing right now: the list is open and non-empty.
    pub fn visible_suggestions(&self) -> &[GeoCandidate] {
        if self.suggestions_open { &self.suggestions } else { &[] }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
