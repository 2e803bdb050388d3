//! Browser window.
//!
//! [`ShellWindow`] wires the toolbar and address bar to the active tab and to
//! the history log. It owns the policy that turns typed text into a URL.

use crate::address_bar::{AddressBar, AddressBarAction, Key};
use crate::context::{AppContext, Asset, SearchEngine};
use crate::engine::{EngineFactory, EngineMessage};
use crate::history::HistoryStore;
use crate::history_ui::HistoryDialog;
use crate::navigation::{toolbar, ToolbarAction, ToolbarItem};
use crate::tab::TabId;
use crate::tab_host::{TabHost, TabLabel};
use common::BrowserResult;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turn address-bar input into the URL to load.
///
/// Input without a `.` is a search query; input with a `.` but without `http`
/// gets an `https://` prefix; anything else is used as typed. This is a
/// heuristic, not a validator: `"a.b c"` yields `"https://a.b c"` and the
/// engine shows its own error page for it.
pub fn resolve_input(input: &str, search: &SearchEngine) -> String {
    if !input.contains('.') {
        search.query_url(input)
    } else if !input.contains("http") {
        format!("https://{input}")
    } else {
        input.to_string()
    }
}

/// Browser window.
pub struct ShellWindow {
    context: Arc<AppContext>,
    /// Tabs.
    tabs: TabHost,
    /// Address bar, shared with the tab listeners that keep it in sync.
    address_bar: Arc<Mutex<AddressBar>>,
    history: Arc<HistoryStore>,
    toolbar: Vec<ToolbarItem>,
    /// Window icon file, if present.
    icon: Option<PathBuf>,
}

impl ShellWindow {
    /// Create a window with one tab showing the home page.
    pub fn new(context: Arc<AppContext>, factory: Arc<dyn EngineFactory>) -> Self {
        let history = Arc::new(HistoryStore::new(&context.history_path));
        let address_bar = Arc::new(Mutex::new(AddressBar::new()));
        let mut tabs = TabHost::new(context.clone(), factory);

        let bar = address_bar.clone();
        tabs.on_url_changed(move |event| bar.lock().on_url_changed(event));

        let log = history.clone();
        tabs.on_url_changed(move |event| {
            if let Err(error) = log.append(&event.url) {
                warn!(tab = %event.tab, %error, "failed to record history");
            }
        });

        let bar = address_bar.clone();
        tabs.on_active_changed(move |event| bar.lock().track(event.tab, &event.url));

        let toolbar = toolbar(&context.assets);
        let icon = match context.assets.locate(Asset::WindowIcon) {
            Ok(path) => Some(path),
            Err(error) => {
                debug!(%error, "window icon unavailable");
                None
            }
        };
        let mut window = Self {
            context,
            tabs,
            address_bar,
            history,
            toolbar,
            icon,
        };
        window.tabs.create_tab();
        info!(title = %window.context.window_title, "window ready");
        window
    }

    pub fn title(&self) -> &str {
        &self.context.window_title
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn tabs(&self) -> &TabHost {
        &self.tabs
    }

    pub fn tab_labels(&self) -> Vec<TabLabel> {
        self.tabs.labels()
    }

    pub fn toolbar(&self) -> &[ToolbarItem] {
        &self.toolbar
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Text currently shown in the address field.
    pub fn address_text(&self) -> String {
        self.address_bar.lock().input().to_string()
    }

    pub fn is_editing_address(&self) -> bool {
        self.address_bar.lock().is_focused()
    }

    /// Resolve typed input with this window's search engine.
    pub fn resolve(&self, input: &str) -> String {
        resolve_input(input, &self.context.search_engine)
    }

    /// Resolve `input`, load it in the active tab and record the resolved
    /// URL in history. Returns the resolved URL.
    pub fn resolve_and_navigate(&mut self, input: &str) -> BrowserResult<String> {
        let url = self.resolve(input);
        self.navigate_to_resolved(&url)?;
        Ok(url)
    }

    /// Load an already-resolved URL in the active tab and record it.
    pub fn navigate_to_resolved(&mut self, url: &str) -> BrowserResult<()> {
        let tab = self.tabs.active_tab_mut()?;
        info!(tab = %tab.id(), %url, "navigating");
        tab.load(url);
        self.record(url);
        Ok(())
    }

    pub fn back(&mut self) -> BrowserResult<()> {
        self.tabs.active_tab_mut()?.back();
        Ok(())
    }

    pub fn forward(&mut self) -> BrowserResult<()> {
        self.tabs.active_tab_mut()?.forward();
        Ok(())
    }

    pub fn reload(&mut self) -> BrowserResult<()> {
        self.tabs.active_tab_mut()?.reload();
        Ok(())
    }

    /// Load the home page. Unlike typed navigation this does not add a
    /// history line itself; the tab's URL listener still records the visit.
    pub fn home(&mut self) -> BrowserResult<()> {
        let home = self.context.home_url.clone();
        self.tabs.active_tab_mut()?.load(&home);
        Ok(())
    }

    pub fn new_tab(&mut self) -> TabId {
        self.tabs.create_tab()
    }

    /// Close the tab at `index`. Closing the last tab leaves the window
    /// without tabs until [`ShellWindow::new_tab`] is called.
    pub fn close_tab(&mut self, index: usize) -> BrowserResult<TabId> {
        let closed = self.tabs.close_tab(index)?;
        if self.tabs.is_empty() {
            self.address_bar.lock().detach();
        }
        Ok(closed)
    }

    pub fn activate_tab(&mut self, index: usize) -> BrowserResult<()> {
        self.tabs.set_active(index)
    }

    /// Open the history dialog on the current contents of the log.
    pub fn show_history(&self) -> HistoryDialog {
        HistoryDialog::open(self.history.clone())
    }

    /// Run a toolbar action. History hands back the dialog it opened.
    pub fn trigger(&mut self, action: ToolbarAction) -> BrowserResult<Option<HistoryDialog>> {
        debug!(?action, "toolbar action");
        match action {
            ToolbarAction::Back => self.back()?,
            ToolbarAction::Forward => self.forward()?,
            ToolbarAction::Reload => self.reload()?,
            ToolbarAction::Home => self.home()?,
            ToolbarAction::NewTab => {
                self.new_tab();
            }
            ToolbarAction::History => return Ok(Some(self.show_history())),
        }
        Ok(None)
    }

    /// Replace the address field text, as typing would.
    pub fn edit_address(&mut self, text: &str) {
        self.address_bar.lock().set_input(text);
    }

    /// Feed a key to the address field. Enter resolves and navigates; the
    /// resolved URL is returned.
    pub fn address_key(&mut self, key: Key) -> BrowserResult<Option<String>> {
        let action = self.address_bar.lock().on_key(key);
        match action {
            Some(AddressBarAction::Navigate(text)) => self.resolve_and_navigate(&text).map(Some),
            Some(AddressBarAction::Cancel) | None => Ok(None),
        }
    }

    /// Submit the address field.
    pub fn submit_address(&mut self) -> BrowserResult<Option<String>> {
        self.address_key(Key::Enter)
    }

    /// Route an engine notification to its tab.
    pub fn handle_engine_event(&mut self, message: EngineMessage) -> Option<TabId> {
        self.tabs.dispatch(message.tab, message.event)
    }

    fn record(&self, url: &str) {
        if let Err(error) = self.history.append(url) {
            warn!(%url, %error, "failed to record history");
        }
    }
}
