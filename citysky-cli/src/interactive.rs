//! Line-oriented front-end over a [`Session`].
//!
//! Each entered line counts as an input change. Once the debounced
//! suggestions arrive the user picks one, or searches the raw text.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Utc};
use citysky_core::{
    Action, Config, FilePreferenceStore, LookupClient, PreferenceStore, Session, ViewState,
    provider::source_from_config,
};
use inquire::{InquireError, Select, Text, list_option::ListOption};

use crate::render;

const HELP: &str = "Type a city name and press Enter. \
Commands: :history <n>, :reset, :theme, :help, :quit";

#[derive(Debug, PartialEq)]
enum Line {
    Text(String),
    History(usize),
    Reset,
    Theme,
    Help,
    Quit,
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let Some(command) = trimmed.strip_prefix(':') else {
            return Line::Text(raw.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("q" | "quit"), _) => Line::Quit,
            (Some("reset"), _) => Line::Reset,
            (Some("theme"), _) => Line::Theme,
            (Some("h" | "history"), Some(n)) => n.parse().map_or(Line::Help, Line::History),
            _ => Line::Help,
        }
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let client = LookupClient::new(source_from_config(config)?);
    let prefs: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::open_default()?);
    let mut session = Session::new(client, prefs, config.debounce());

    println!("{HELP}");

    loop {
        let Some(raw) = prompt_line(session.state().input().to_string()).await? else {
            break;
        };

        match Line::parse(&raw) {
            Line::Quit => break,
            Line::Help => println!("{HELP}"),
            Line::Reset => session.dispatch(Action::Reset),
            Line::Theme => {
                session.dispatch(Action::ToggleTheme);
                println!("Theme: {}", session.state().theme());
            }
            Line::History(index) if index >= session.state().history().len() => {
                println!("No recent search at position {index}.");
                continue;
            }
            Line::History(index) => {
                session.dispatch(Action::RecallHistory(index));
                look_up(&mut session).await?;
            }
            Line::Text(text) => {
                session.dispatch(Action::InputChanged(text));
                look_up(&mut session).await?;
            }
        }

        show(session.state());
    }

    Ok(())
}

/// Wait for suggestions for the current input, let the user pick, then search.
///
/// Only called right after the input changed, so a non-blank input always has
/// exactly one suggestion lookup in flight.
async fn look_up(session: &mut Session) -> Result<()> {
    let labels = if session.state().input().trim().is_empty() {
        Vec::new()
    } else {
        session.next_event().await;
        render::suggestion_lines(session.state().visible_suggestions())
    };

    if labels.is_empty() {
        session.dispatch(Action::Submit);
    } else {
        let mut options = vec![format!("Search \"{}\"", session.state().input().trim())];
        options.extend(labels);

        match pick(options).await? {
            Some(0) => session.dispatch(Action::Submit),
            Some(index) => session.dispatch(Action::SelectSuggestion(index - 1)),
            None => {
                session.dispatch(Action::CloseSuggestions);
                return Ok(());
            }
        }
    }

    if session.state().is_busy() {
        println!("Fetching weather info...");
        session.next_event().await;
    }

    Ok(())
}

fn show(state: &ViewState) {
    let theme = state.theme();

    if let Some(message) = state.error() {
        println!("{}", render::error_banner(message, theme));
    }
    if let Some(snapshot) = state.weather() {
        let is_day = state.is_daylight(Utc::now().timestamp());
        println!("{}", render::weather_card(snapshot, theme, is_day, Local::now()));
    }
    if let Some(history) = render::history(state.history(), theme) {
        println!("{history}");
    }
}

/// `None` when the user presses Esc or Ctrl-C.
async fn prompt_line(initial: String) -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(move || {
        Text::new("City:").with_initial_value(&initial).prompt_skippable()
    })
    .await?;

    skip_on_interrupt(answer)
}

async fn pick(options: Vec<String>) -> Result<Option<usize>> {
    let answer =
        tokio::task::spawn_blocking(move || Select::new("Pick a match:", options).raw_prompt())
            .await?;

    chosen_index(answer)
}

fn chosen_index<T>(answer: Result<ListOption<T>, InquireError>) -> Result<Option<usize>> {
    skip_on_interrupt(answer.map(|choice| Some(choice.index)))
}

fn skip_on_interrupt<T>(answer: Result<Option<T>, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(value),
        Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_input_change() {
        assert_eq!(Line::parse("  New York "), Line::Text("  New York ".into()));
    }

    #[test]
    fn commands_are_recognised() {
        assert_eq!(Line::parse(":q"), Line::Quit);
        assert_eq!(Line::parse(":reset"), Line::Reset);
        assert_eq!(Line::parse(":theme"), Line::Theme);
        assert_eq!(Line::parse(":history 2"), Line::History(2));
        assert_eq!(Line::parse(":history two"), Line::Help);
        assert_eq!(Line::parse(":unknown"), Line::Help);
    }

    #[test]
    fn picked_option_maps_to_its_index() {
        let answer = Ok(ListOption::new(2, "Paris, FR".to_string()));
        assert_eq!(chosen_index(answer).unwrap(), Some(2));
    }

    #[test]
    fn escape_and_ctrl_c_skip_the_pick() {
        let cancelled: Result<ListOption<String>, _> = Err(InquireError::OperationCanceled);
        assert_eq!(chosen_index(cancelled).unwrap(), None);

        let interrupted: Result<ListOption<String>, _> = Err(InquireError::OperationInterrupted);
        assert_eq!(chosen_index(interrupted).unwrap(), None);

        let broken: Result<ListOption<String>, _> = Err(InquireError::NotTTY);
        assert!(chosen_index(broken).is_err());
    }
}
