use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::sync::Arc;
use tracing::{debug, info};
use weather_core::{CacheStore, Config, FileStore, QueryController, ViewState, WeatherApiClient};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com credentials. Prompts when no key is given.
    Configure {
        #[arg(long)]
        api_key: Option<String>,

        /// Override the current-conditions endpoint.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Look up current weather for a location.
    Show {
        /// Location search term, passed to the service as-is.
        location: String,

        /// Render the expanded view instead of the compact one.
        #[arg(long)]
        detailed: bool,
    },

    /// Show the last successful lookup without touching the network.
    Last,

    /// Forget the last successful lookup.
    ClearCache,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, endpoint } => configure(api_key, endpoint),
            Command::Show { location, detailed } => show(location, detailed).await,
            Command::Last => {
                let summary = open_cache()?.load();
                let view = if summary.is_some() { ViewState::Detailed } else { ViewState::Initial };
                println!("{}", render::render(&view, summary.as_ref()));
                Ok(())
            }
            Command::ClearCache => {
                open_cache()?.clear();
                println!("Cleared cached weather.");
                Ok(())
            }
        }
    }
}

fn open_cache() -> anyhow::Result<CacheStore> {
    let dir = Config::cache_dir()?;
    Ok(CacheStore::new(Arc::new(FileStore::new(dir))))
}

fn configure(api_key: Option<String>, endpoint: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("WeatherAPI.com API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };
    config.set_api_key(api_key);

    if endpoint.is_some() {
        config.endpoint = endpoint;
    }

    config.save()?;
    info!(endpoint = config.endpoint(), "saved weather configuration");
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: String, detailed: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = WeatherApiClient::from_config(&config)?;
    let controller = QueryController::new(Arc::new(client), open_cache()?);

    let mut updates = controller.subscribe();
    debug!(%location, "starting weather lookup");
    let handle = controller.update_values(location);

    loop {
        let view = updates.borrow_and_update().view_state.clone();
        if view != ViewState::Loading {
            break;
        }
        eprintln!("{}", render::render(&view, None));
        updates.changed().await?;
    }
    handle.await?;

    if detailed {
        controller.expand_to_detail_view();
    }

    let snapshot = controller.snapshot();
    debug!(view = ?snapshot.view_state, "weather lookup finished");
    println!("{}", render::render(&snapshot.view_state, snapshot.last_summary.as_ref()));
    Ok(())
}
