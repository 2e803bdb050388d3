//! Shell configuration.

use common::{BrowserError, BrowserResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use ui::context::{
    Assets, SearchEngine, DEFAULT_HISTORY_FILE, DEFAULT_HOME_URL, DEFAULT_SEARCH_TEMPLATE,
    DEFAULT_WINDOW_TITLE,
};
use ui::engine::Modifiers;
use ui::AppContext;

/// Shell configuration, read from a JSON file. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page loaded by new tabs and the Home action.
    pub home_url: String,
    /// Search URL; `%s` is replaced with the escaped query.
    pub search_template: String,
    /// History log location.
    pub history_file: PathBuf,
    /// Directory holding `public/` and `prismjs/`.
    pub asset_root: PathBuf,
    pub window_title: String,
    /// Modifier that opens links in a new tab (`shift`, `ctrl`, `alt`, `meta`).
    pub new_tab_modifier: String,
}

impl AppConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> BrowserResult<Self> {
        let text = fs::read_to_string(path).map_err(|error| BrowserError::file(path, error))?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Set the home page.
    pub fn with_home_url(mut self, home_url: &str) -> Self {
        self.home_url = home_url.to_string();
        self
    }

    /// Set the history file.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    /// Set the asset root.
    pub fn with_asset_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_root = path.into();
        self
    }

    /// Build the context the shell window runs with.
    pub fn into_context(self) -> BrowserResult<AppContext> {
        let modifier = Modifiers::from_config_name(&self.new_tab_modifier).ok_or_else(|| {
            BrowserError::config(format!(
                "unknown new tab modifier `{}`",
                self.new_tab_modifier
            ))
        })?;

        Ok(AppContext::new(self.history_file)
            .with_home_url(self.home_url)
            .with_search_engine(SearchEngine::new(self.search_template))
            .with_assets(Assets::new(self.asset_root))
            .with_new_tab_modifier(modifier)
            .with_window_title(self.window_title))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_url: DEFAULT_HOME_URL.to_string(),
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            asset_root: PathBuf::from("."),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            new_tab_modifier: "shift".to_string(),
        }
    }
}
