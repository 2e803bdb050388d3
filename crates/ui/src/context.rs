//! Application context shared by the shell window and its dialogs.

use crate::engine::Modifiers;
use common::{BrowserError, BrowserResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Page loaded by new tabs and the Home action.
pub const DEFAULT_HOME_URL: &str = "https://search.louiml.net";

/// Search URL used when typed input does not look like an address.
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";

pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

pub const DEFAULT_WINDOW_TITLE: &str = "Creag";

/// Title shown for tabs whose page has no title.
pub const NEW_TAB_TITLE: &str = "New Tab";

/// Search engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchEngine {
    /// Search URL template; `%s` is replaced with the escaped query.
    pub url_template: String,
}

impl SearchEngine {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    /// Build the search URL for a raw query.
    pub fn query_url(&self, query: &str) -> String {
        let escaped: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        if self.url_template.contains("%s") {
            self.url_template.replace("%s", &escaped)
        } else {
            format!("{}{}", self.url_template, escaped)
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TEMPLATE)
    }
}

/// Static files the shell reads at the point of use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    WindowIcon,
    PlaceholderIcon,
    BackIcon,
    ForwardIcon,
    ReloadIcon,
    HomeIcon,
    NewTabIcon,
    HistoryIcon,
    HighlightScript,
    HighlightStylesheet,
}

impl Asset {
    /// Path relative to the asset root.
    pub fn relative_path(self) -> &'static str {
        match self {
            Asset::WindowIcon => "public/icon.ico",
            Asset::PlaceholderIcon => "public/no_icon_icon.png",
            Asset::BackIcon => "public/back_icon.png",
            Asset::ForwardIcon => "public/forward_icon.png",
            Asset::ReloadIcon => "public/reload_icon.png",
            Asset::HomeIcon => "public/home_icon.png",
            Asset::NewTabIcon => "public/new_tab_icon.png",
            Asset::HistoryIcon => "public/history_icon.png",
            Asset::HighlightScript => "prismjs/prism.js",
            Asset::HighlightStylesheet => "prismjs/prism.css",
        }
    }
}

/// Resolves [`Asset`]s against a root directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, asset: Asset) -> PathBuf {
        self.root.join(asset.relative_path())
    }

    /// Path of `asset` if the file exists.
    pub fn locate(&self, asset: Asset) -> BrowserResult<PathBuf> {
        let path = self.path(asset);
        if path.is_file() {
            Ok(path)
        } else {
            Err(BrowserError::missing_asset(path))
        }
    }

    /// Read a text asset.
    pub fn read_text(&self, asset: Asset) -> BrowserResult<String> {
        let path = self.path(asset);
        fs::read_to_string(&path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                BrowserError::missing_asset(path)
            } else {
                BrowserError::file(path, error)
            }
        })
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Everything the shell needs that used to be ambient: where history lives,
/// what Home means, how searches are built, where assets are.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub history_path: PathBuf,
    pub home_url: String,
    pub search_engine: SearchEngine,
    pub assets: Assets,
    /// Modifier that turns a new-window request into a new tab.
    pub new_tab_modifier: Modifiers,
    pub window_title: String,
}

impl AppContext {
    pub fn new(history_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            ..Self::default()
        }
    }

    pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
        self.home_url = home_url.into();
        self
    }

    pub fn with_search_engine(mut self, search_engine: SearchEngine) -> Self {
        self.search_engine = search_engine;
        self
    }

    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_new_tab_modifier(mut self, modifier: Modifiers) -> Self {
        self.new_tab_modifier = modifier;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            home_url: DEFAULT_HOME_URL.to_string(),
            search_engine: SearchEngine::default(),
            assets: Assets::default(),
            new_tab_modifier: Modifiers::SHIFT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}
