//! Configuration management for taskly.
//!
//! Settings are stored as pretty-printed JSON (`config.json`) in the
//! platform data directory resolved by [`DataStorage`].
//!
//! ## Configuration Structure
//!
//! Each section is optional and configured independently:
//!
//! - **API**: base URL of the task API
//! - **View**: page size and search debounce of the task view
//!
//! ## Environment
//!
//! `TASKLY_API_URL` overrides the configured base URL. It is read after
//! `.env` has been loaded, so a project-local `.env` file works as well.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use taskly::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::read()?;
//! let api_url = config.api_url()?;
//! let limit = config.page_limit();
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use super::query::DEFAULT_PAGE_LIMIT;
use super::view_state::DEFAULT_SEARCH_DEBOUNCE;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding [`ApiConfig::api_url`].
pub const API_URL_ENV: &str = "TASKLY_API_URL";

/// A configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Identifier used to route the selection
    pub key: String,
    /// Name shown in the wizard
    pub name: String,
}

/// Connection to the task API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    ///
    /// Example: `https://tasks.example.com/api`
    pub api_url: String,
}

impl ApiConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "api".to_string(),
            name: "API".to_string(),
        }
    }

    /// Prompts for the section, pre-filled from `current`.
    pub fn init(current: &Option<ApiConfig>) -> Result<Self> {
        let default = current.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleApi);
        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(default.api_url)
                .interact_text()?,
        })
    }
}

/// Task view settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Tasks requested per page.
    pub page_limit: u32,

    /// Quiet interval in milliseconds after the last search keystroke
    /// before the search is sent.
    pub search_debounce_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl ViewConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "view".to_string(),
            name: "Task view".to_string(),
        }
    }

    pub fn init(current: &Option<ViewConfig>) -> Result<Self> {
        let default = current.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleView);
        Ok(Self {
            page_limit: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPageLimit.to_string())
                .default(default.page_limit)
                .interact_text()?,
            search_debounce_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSearchDebounce.to_string())
                .default(default.search_debounce_ms)
                .interact_text()?,
        })
    }
}

/// Root configuration object.
///
/// Unconfigured sections are omitted from the JSON file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewConfig>,
}

impl Config {
    /// Reads `config.json`, or the default configuration when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive setup wizard, starting from the saved values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![ApiConfig::module(), ViewConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "api" => config.api = Some(ApiConfig::init(&config.api)?),
                "view" => config.view = Some(ViewConfig::init(&config.view)?),
                _ => {}
            }
        }

        Ok(config)
    }

    /// Base URL of the task API; `TASKLY_API_URL` wins over the file.
    pub fn api_url(&self) -> Result<String> {
        let from_env = env::var(API_URL_ENV).ok().filter(|url| !url.trim().is_empty());
        let from_file = self.api.as_ref().map(|api| api.api_url.clone()).filter(|url| !url.trim().is_empty());

        match from_env.or(from_file) {
            Some(url) => Ok(url.trim().trim_end_matches('/').to_string()),
            None => msg_bail_anyhow!(Message::ApiUrlNotSet),
        }
    }

    pub fn page_limit(&self) -> u32 {
        self.view.as_ref().map_or(DEFAULT_PAGE_LIMIT, |view| view.page_limit.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        self.view
            .as_ref()
            .map_or(DEFAULT_SEARCH_DEBOUNCE, |view| Duration::from_millis(view.search_debounce_ms))
    }
}
