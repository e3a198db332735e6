use std::{fmt, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weather_dash_core::{
    Config, Dashboard, FileStore, LookupOutcome, RecentCity, RecentSearchStore, Units,
    client_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// Runs the interactive dashboard when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and preferred units.
    Configure,

    /// Show current weather and forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// List recently searched cities.
    Recent,

    /// Search, pick recent cities and refresh in a loop.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config),
            Command::Show { city } => show(&config, &city).await,
            Command::Recent => {
                let recent = recent_store(&config)?.load_or_default();
                print!("{}", render::recent_list(&recent));
                Ok(())
            }
            Command::Interactive => interactive(&config).await,
        }
    }
}

fn recent_store(config: &Config) -> anyhow::Result<RecentSearchStore> {
    let dir = config.data_dir()?;
    debug!(dir = %dir.display(), "using recent-search directory");
    Ok(RecentSearchStore::new(FileStore::new(dir)))
}

fn build_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let client = client_from_config(config)?;
    Ok(Dashboard::new(Arc::new(client), recent_store(config)?))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let default_units = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(default_units)
        .prompt()
        .context("Failed to read unit system")?;

    config.set_api_key(api_key);
    config.units = units;
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let dashboard = build_dashboard(config)?;

    match dashboard.search(city).await {
        LookupOutcome::Failed(err) => Err(err.into()),
        _ => {
            print!("{}", render::state(&dashboard.state(), config.units));
            Ok(())
        }
    }
}

/// Menu entries of the interactive dashboard.
#[derive(Debug, Clone)]
enum Action {
    Search,
    Refresh(String),
    Recent(RecentCity),
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search for a city"),
            Action::Refresh(city) => write!(f, "Refresh {city}"),
            Action::Recent(city) => write!(f, "Recent: {city}"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn menu(dashboard: &Dashboard) -> Vec<Action> {
    let mut actions = vec![Action::Search];
    if let Some(city) = dashboard.state().displayed_city() {
        actions.push(Action::Refresh(city.to_string()));
    }
    let recent = dashboard.recent();
    actions.extend(recent.iter().cloned().map(Action::Recent));
    actions.push(Action::Quit);
    actions
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let dashboard = build_dashboard(config)?;
    println!("{}", render::banner());

    loop {
        let action = match Select::new("What next?", menu(&dashboard)).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read menu choice"),
        };

        let outcome = match action {
            Action::Quit => break,
            Action::Search => {
                let city = match Text::new("City:").prompt() {
                    Ok(city) => city,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(err) => return Err(err).context("Failed to read city"),
                };
                println!("{}", render::progress("Searching", &city));
                dashboard.search(&city).await
            }
            Action::Recent(city) => {
                println!("{}", render::progress("Loading", &city.name));
                dashboard.select_recent(&city.name).await
            }
            Action::Refresh(city) => {
                println!("{}", render::progress("Refreshing", &city));
                dashboard.refresh().await
            }
        };
        debug!(?outcome, "command finished");

        print!("{}", render::state(&dashboard.state(), config.units));
        for note in dashboard.take_notifications() {
            println!("{}", render::notification(&note));
        }
    }

    Ok(())
}
