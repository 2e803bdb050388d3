//! Ordered tab collection with one active tab.

use crate::context::AppContext;
use crate::engine::{EngineEvent, EngineFactory};
use crate::events::{ActiveTabChanged, Subscribers, UrlChanged};
use crate::tab::{Tab, TabIcon, TabId};
use common::{BrowserError, BrowserResult};
use std::sync::Arc;
use tracing::{debug, info};

/// What the tab strip shows for one tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabLabel {
    pub id: TabId,
    pub title: String,
    pub icon: TabIcon,
    pub active: bool,
}

/// Owns the tabs of one window.
pub struct TabHost {
    context: Arc<AppContext>,
    factory: Arc<dyn EngineFactory>,
    /// Tabs in strip order.
    tabs: Vec<Tab>,
    /// Index of the active tab; `None` only when there are no tabs.
    active: Option<usize>,
    /// Tab ID counter.
    tab_counter: u64,
    /// URL listeners handed to every new tab.
    url_subscribers: Subscribers<UrlChanged>,
    active_subscribers: Subscribers<ActiveTabChanged>,
}

impl TabHost {
    /// Create an empty host. Tabs are created with engines from `factory`.
    pub fn new(context: Arc<AppContext>, factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            context,
            factory,
            tabs: Vec::new(),
            active: None,
            tab_counter: 0,
            url_subscribers: Subscribers::new(),
            active_subscribers: Subscribers::new(),
        }
    }

    /// Listen for URL changes on every tab, present and future.
    pub fn on_url_changed(&mut self, handler: impl Fn(&UrlChanged) + Send + Sync + 'static) {
        self.url_subscribers.subscribe(handler);
        for tab in &mut self.tabs {
            tab.set_url_subscribers(self.url_subscribers.clone());
        }
    }

    /// Listen for active tab switches.
    pub fn on_active_changed(
        &mut self,
        handler: impl Fn(&ActiveTabChanged) + Send + Sync + 'static,
    ) {
        self.active_subscribers.subscribe(handler);
    }

    /// Create a new tab pointed at the home URL and make it active.
    pub fn create_tab(&mut self) -> TabId {
        self.tab_counter += 1;
        let id = TabId(self.tab_counter);

        let engine = self.factory.create(id);
        let mut tab = Tab::new(id, engine, &self.context.home_url);
        tab.set_url_subscribers(self.url_subscribers.clone());
        self.tabs.push(tab);
        info!(tab = %id, count = self.tabs.len(), "opened tab");

        self.set_active_index(Some(self.tabs.len() - 1));
        id
    }

    /// Close the tab at `index`. When it was active, the tab that slides into
    /// its position becomes active, or the new last tab if it was the last.
    pub fn close_tab(&mut self, index: usize) -> BrowserResult<TabId> {
        if index >= self.tabs.len() {
            return Err(BrowserError::invalid(format!(
                "no tab at index {index} ({} open)",
                self.tabs.len()
            )));
        }

        let previous = self.active_key();
        let removed = self.tabs.remove(index);
        info!(tab = %removed.id(), count = self.tabs.len(), "closed tab");

        let next = if self.tabs.is_empty() {
            None
        } else {
            match self.active {
                Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
                Some(active) if active > index => Some(active - 1),
                other => other,
            }
        };
        self.active = next;
        if self.active_key() != previous {
            self.notify_active_changed();
        }

        Ok(removed.id())
    }

    /// Make the tab at `index` active.
    pub fn set_active(&mut self, index: usize) -> BrowserResult<()> {
        if index >= self.tabs.len() {
            return Err(BrowserError::invalid(format!(
                "no tab at index {index} ({} open)",
                self.tabs.len()
            )));
        }
        self.set_active_index(Some(index));
        Ok(())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Get the active tab.
    pub fn active_tab(&self) -> BrowserResult<&Tab> {
        self.active
            .and_then(|index| self.tabs.get(index))
            .ok_or(BrowserError::NoActiveTab)
    }

    /// Get the active tab mutably.
    pub fn active_tab_mut(&mut self) -> BrowserResult<&mut Tab> {
        self.active
            .and_then(|index| self.tabs.get_mut(index))
            .ok_or(BrowserError::NoActiveTab)
    }

    /// Get a tab.
    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    /// Get a mutable tab.
    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    /// Get all tabs in strip order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get the tab count.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tab strip contents.
    pub fn labels(&self) -> Vec<TabLabel> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| TabLabel {
                id: tab.id(),
                title: tab.title().to_string(),
                icon: tab.icon().clone(),
                active: self.active == Some(index),
            })
            .collect()
    }

    /// Route an engine event to the tab that produced it.
    ///
    /// Returns the id of a tab opened in response (a new-window request with
    /// the new-tab modifier held). Events for tabs that no longer exist are
    /// dropped.
    pub fn dispatch(&mut self, id: TabId, event: EngineEvent) -> Option<TabId> {
        let context = self.context.clone();
        let Some(tab) = self.tab_mut(id) else {
            debug!(tab = %id, ?event, "dropping event for closed tab");
            return None;
        };

        let request = tab.handle_event(event, &context)?;
        let sibling = self.create_tab();
        if let Some(tab) = self.tab_mut(sibling) {
            tab.load(&request.url);
        }
        debug!(opener = %id, tab = %sibling, url = %request.url, "opened link in new tab");
        Some(sibling)
    }

    fn active_key(&self) -> Option<(usize, TabId)> {
        self.active
            .and_then(|index| self.tabs.get(index).map(|tab| (index, tab.id())))
    }

    fn set_active_index(&mut self, index: Option<usize>) {
        let previous = self.active_key();
        self.active = index;
        if self.active_key() != previous {
            self.notify_active_changed();
        }
    }

    fn notify_active_changed(&self) {
        let Some((index, tab)) = self.active_key() else {
            return;
        };
        let url = self.tabs[index].url().to_string();
        debug!(%tab, index, "active tab changed");
        self.active_subscribers
            .emit(&ActiveTabChanged { index, tab, url });
    }
}
