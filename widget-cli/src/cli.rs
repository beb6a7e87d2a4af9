use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_widget_core::{
    HostEvent, KeyValueStore, ListService, ReloadOutcome, WidgetConfig, WidgetId,
    WidgetListDataProvider, WidgetUpdateCoordinator, model::decode_records,
};

use crate::host::{ConsoleHost, format_row};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Weather widget list harness")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reload the cached locations and print the rows a widget would show.
    Show,

    /// Store a JSON location list in the cache, as the app would.
    Seed {
        /// File holding the JSON array; "-" reads stdin.
        file: PathBuf,
    },

    /// Remove the cached location list.
    Clear,

    /// Deliver a refresh broadcast to placed widgets and print their rows.
    Refresh {
        /// Placed widget id; repeat for several widgets.
        #[arg(long = "widget", default_values_t = [1])]
        widgets: Vec<WidgetId>,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = WidgetConfig::load()?;

        match self.command {
            Command::Show => show(&config),
            Command::Seed { file } => seed(&config, &file),
            Command::Clear => {
                config.open_store()?.remove(&config.cache_key)?;
                println!("Cleared cached weather data");
                Ok(())
            }
            Command::Refresh { widgets } => refresh(&config, widgets),
            Command::ConfigPath => {
                println!("{}", WidgetConfig::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn show(config: &WidgetConfig) -> anyhow::Result<()> {
    let store = config.open_store()?;
    let provider =
        WidgetListDataProvider::with_cache_key(store, config.renderer(), &config.cache_key);

    match provider.reload() {
        ReloadOutcome::Loaded(0) | ReloadOutcome::Missing => println!("No locations cached"),
        ReloadOutcome::Malformed => {
            println!("Cached data is malformed; widget shows an empty list")
        }
        ReloadOutcome::Loaded(_) | ReloadOutcome::Ignored => {
            for position in 0..provider.len() {
                println!("{}", format_row(&provider.row(position as i32)));
            }
        }
    }

    Ok(())
}

fn seed(config: &WidgetConfig, file: &Path) -> anyhow::Result<()> {
    let payload = if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("Failed to read payload from stdin")?;
        buf
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("Failed to read payload file: {}", file.display()))?
    };

    // Malformed payloads are stored anyway so the widget's handling can be exercised.
    match decode_records(&payload) {
        Ok(records) => println!("Seeding {} location(s)", records.len()),
        Err(err) => tracing::warn!("Payload does not decode, widget will show nothing: {err}"),
    }

    let store = config.open_store()?;
    store
        .put(&config.cache_key, &payload)
        .with_context(|| format!("Failed to write cache: {}", store.path().display()))?;

    Ok(())
}

fn refresh(config: &WidgetConfig, widgets: Vec<WidgetId>) -> anyhow::Result<()> {
    let store = Arc::new(config.open_store()?);
    let service = ListService::with_cache_key(store, config.renderer(), &config.cache_key);
    let host = ConsoleHost::new(service, widgets);

    WidgetUpdateCoordinator.on_refresh_signal(&host, &HostEvent::widget_update());

    for &widget_id in host.placed() {
        println!("Widget {widget_id}:");
        match host.rows(widget_id) {
            Some(rows) if !rows.is_empty() => {
                for row in rows {
                    println!("  {}", format_row(&row));
                }
            }
            _ => println!("  (empty)"),
        }
    }

    host.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_defaults_to_one_widget() {
        let cli = Cli::try_parse_from(["weather-widget", "refresh"]).expect("should parse");
        match cli.command {
            Command::Refresh { widgets } => assert_eq!(widgets, vec![1]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn refresh_accepts_repeated_widgets() {
        let args = ["weather-widget", "refresh", "--widget", "4", "--widget", "9"];
        let cli = Cli::try_parse_from(args).expect("should parse");
        match cli.command {
            Command::Refresh { widgets } => assert_eq!(widgets, vec![4, 9]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn seed_requires_file() {
        assert!(Cli::try_parse_from(["weather-widget", "seed"]).is_err());
    }

    #[test]
    fn seed_writes_payload_into_configured_store() {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("payload.json");
        fs::write(&payload_path, r#"[{"locationName":"Lima"}]"#).unwrap();
        let config =
            WidgetConfig { store_dir: Some(dir.path().join("store")), ..Default::default() };

        seed(&config, &payload_path).expect("seed should succeed");

        let stored = config.open_store().unwrap().get(&config.cache_key).unwrap();
        assert_eq!(stored.as_deref(), Some(r#"[{"locationName":"Lima"}]"#));
    }
}
