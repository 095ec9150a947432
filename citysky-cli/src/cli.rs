use anyhow::{Context, bail};
use chrono::{Local, Utc};
use citysky_core::{
    Config, LookupClient, SearchTarget,
    prefs::{self, FilePreferenceStore},
    provider::source_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citysky", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris, US".
        city: String,
    },

    /// List up to five cities matching a partial name.
    Suggest {
        query: String,
    },

    /// Show the persisted theme, or toggle it.
    Theme {
        #[arg(long)]
        toggle: bool,
    },

    /// Type-ahead lookup loop with recent searches.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Suggest { query } => suggest(&query).await,
            Command::Theme { toggle } => theme(toggle),
            Command::Interactive => interactive::run(&Config::load()?).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn client() -> anyhow::Result<LookupClient> {
    let config = Config::load()?;
    Ok(LookupClient::new(source_from_config(&config)?))
}

async fn show(city: String) -> anyhow::Result<()> {
    let client = client()?;
    let theme = prefs::load_theme(&FilePreferenceStore::open_default()?);

    match client.resolve_and_fetch(&SearchTarget::City(city)).await {
        Ok(resolved) => {
            let snapshot = &resolved.snapshot;
            let is_day = snapshot.is_daylight_at(Utc::now().timestamp());
            print!("{}", render::weather_card(snapshot, theme, is_day, Local::now()));
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, "lookup failed");
            bail!(err.user_message())
        }
    }
}

async fn suggest(query: &str) -> anyhow::Result<()> {
    let candidates = client()?.fetch_suggestions(query).await;

    if candidates.is_empty() {
        println!("No matching cities.");
    }
    for line in render::suggestion_lines(&candidates) {
        println!("{line}");
    }

    Ok(())
}

fn theme(toggle: bool) -> anyhow::Result<()> {
    let store = FilePreferenceStore::open_default()?;
    let mut theme = prefs::load_theme(&store);

    if toggle {
        theme = theme.toggled();
        prefs::save_theme(&store, theme)?;
    }

    println!("{theme}");
    Ok(())
}
