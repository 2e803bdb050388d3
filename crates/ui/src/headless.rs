//! In-process engine without rendering.
//!
//! Keeps a per-tab session history, derives a title from the host name, and
//! reports every load, URL change and script completion through the event
//! channel, the same way a real engine reports back to the shell. Used by the
//! command-line shell and for exercising the coordinator end to end.

use crate::engine::{
    EngineEvent, EngineFactory, EngineMessage, EventSender, ScriptId, WebEngine,
};
use crate::tab::TabId;
use tracing::{debug, trace};

/// Navigation history.
#[derive(Debug)]
pub struct NavigationHistory {
    /// History entries.
    entries: Vec<String>,
    /// Current index.
    current: Option<usize>,
    /// Maximum history size.
    max_size: usize,
}

impl NavigationHistory {
    /// Create a new navigation history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            max_size: 50,
        }
    }

    /// Push a new entry, dropping any forward entries.
    pub fn push(&mut self, url: String) {
        if let Some(current) = self.current {
            self.entries.truncate(current + 1);
        }

        self.entries.push(url);

        // Enforce max size
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
        self.current = Some(self.entries.len() - 1);
    }

    /// Go back and return the URL.
    pub fn go_back(&mut self) -> Option<&str> {
        match self.current {
            Some(current) if current > 0 => {
                self.current = Some(current - 1);
                self.entries.get(current - 1).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Go forward and return the URL.
    pub fn go_forward(&mut self) -> Option<&str> {
        match self.current {
            Some(current) if current + 1 < self.entries.len() => {
                self.current = Some(current + 1);
                self.entries.get(current + 1).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Get the current entry.
    pub fn current(&self) -> Option<&str> {
        self.current
            .and_then(|current| self.entries.get(current))
            .map(String::as_str)
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Headless [`WebEngine`] bound to one tab.
pub struct HeadlessEngine {
    tab: TabId,
    sender: EventSender,
    history: NavigationHistory,
    script_counter: u64,
}

impl HeadlessEngine {
    pub fn new(tab: TabId, sender: EventSender) -> Self {
        Self {
            tab,
            sender,
            history: NavigationHistory::new(),
            script_counter: 0,
        }
    }

    fn emit(&self, event: EngineEvent) {
        trace!(tab = %self.tab, ?event, "engine event");
        // The shell is gone when the receiver is dropped; nothing to report to.
        let _ = self.sender.send(EngineMessage {
            tab: self.tab,
            event,
        });
    }

    /// Report a completed load of `url`.
    fn commit(&self, url: &str) {
        self.emit(EngineEvent::LoadStarted);
        self.emit(EngineEvent::UrlChanged(url.to_string()));
        match url::Url::parse(url) {
            Ok(parsed) => {
                let title = parsed.host_str().unwrap_or_default().to_string();
                self.emit(EngineEvent::TitleChanged(title));
                self.emit(EngineEvent::IconChanged(None));
                self.emit(EngineEvent::LoadFinished { ok: true });
            }
            Err(error) => {
                debug!(tab = %self.tab, %url, %error, "cannot load url");
                self.emit(EngineEvent::TitleChanged(String::new()));
                self.emit(EngineEvent::IconChanged(None));
                self.emit(EngineEvent::LoadFinished { ok: false });
            }
        }
    }
}

impl WebEngine for HeadlessEngine {
    fn load(&mut self, url: &str) {
        self.history.push(url.to_string());
        self.commit(url);
    }

    fn back(&mut self) {
        if let Some(url) = self.history.go_back().map(str::to_string) {
            self.commit(&url);
        }
    }

    fn forward(&mut self) {
        if let Some(url) = self.history.go_forward().map(str::to_string) {
            self.commit(&url);
        }
    }

    fn reload(&mut self) {
        if self.history.current().is_some() {
            self.emit(EngineEvent::LoadStarted);
            self.emit(EngineEvent::LoadFinished { ok: true });
        }
    }

    fn url(&self) -> String {
        self.history.current().unwrap_or("about:blank").to_string()
    }

    fn run_script(&mut self, code: &str) -> ScriptId {
        self.script_counter += 1;
        let id = ScriptId(self.script_counter);
        trace!(tab = %self.tab, ?id, bytes = code.len(), "running script");
        self.emit(EngineEvent::ScriptFinished {
            id,
            result: Ok(None),
        });
        id
    }
}

/// Creates [`HeadlessEngine`]s that all report into one channel.
#[derive(Clone)]
pub struct HeadlessEngineFactory {
    sender: EventSender,
}

impl HeadlessEngineFactory {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }
}

impl EngineFactory for HeadlessEngineFactory {
    fn create(&self, tab: TabId) -> Box<dyn WebEngine> {
        Box::new(HeadlessEngine::new(tab, self.sender.clone()))
    }
}
