//! Configuration management for the tickline application.
//!
//! Settings live in a JSON file inside the platform data directory and cover
//! the HTTP server (bind port, optional database path) and the calendar
//! provider (base URL). Environment variables override the file, and the
//! `init` command runs a small interactive setup wizard.

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default port the HTTP API binds to.
pub const DEFAULT_PORT: u16 = 8000;

/// HTTP server settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// TCP port for the HTTP API.
    pub port: u16,
    /// Optional explicit database file path. Defaults to the platform data
    /// directory when unset.
    pub db_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            db_file: None,
        }
    }
}

/// Calendar provider settings. The token itself is supplied per request by
/// the caller and is never stored here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CalendarConfig {
    /// Base URL of the calendar provider API.
    pub api_url: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            api_url: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub server: Option<ServerConfig>,
    pub calendar: Option<CalendarConfig>,
}

impl Config {
    /// Loads the configuration file, falling back to defaults when it does
    /// not exist, then applies environment overrides.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let mut config = if config_file_path.exists() {
            let config_str = fs::read_to_string(config_file_path)?;
            serde_json::from_str(&config_str)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();

        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON to the platform data
    /// directory.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard. Existing values are offered as defaults so
    /// re-running only changes what the user edits.
    pub fn init() -> Result<Self> {
        let current = Config::read()?;
        let theme = ColorfulTheme::default();

        let server_defaults = current.server.clone().unwrap_or_default();
        let port: u16 = Input::with_theme(&theme).with_prompt("HTTP port").default(server_defaults.port).interact_text()?;

        let mut config = Config {
            server: Some(ServerConfig {
                port,
                db_file: server_defaults.db_file,
            }),
            calendar: current.calendar.clone(),
        };

        if Confirm::with_theme(&theme).with_prompt("Configure calendar integration?").default(false).interact()? {
            let calendar_defaults = current.calendar.unwrap_or_default();
            let api_url: String = Input::with_theme(&theme)
                .with_prompt("Calendar API base URL")
                .default(calendar_defaults.api_url)
                .interact_text()?;
            config.calendar = Some(CalendarConfig { api_url });
        }

        Ok(config)
    }

    /// Environment variables take precedence over the file, mainly for
    /// container deployments.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = env::var("TICKLINE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.get_or_insert_with(Default::default).port = port;
            }
        }
        if let Ok(db_file) = env::var("TICKLINE_DB_FILE") {
            self.server.get_or_insert_with(Default::default).db_file = Some(db_file);
        }
        if let Ok(api_url) = env::var("TICKLINE_CALENDAR_URL") {
            self.calendar = Some(CalendarConfig { api_url });
        }
    }
}
