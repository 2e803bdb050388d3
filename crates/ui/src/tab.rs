//! Browser tab.

use crate::context::{AppContext, Asset, NEW_TAB_TITLE};
use crate::engine::{EngineEvent, IconHandle, Modifiers, WebEngine};
use crate::events::{Subscribers, UrlChanged};
use crate::highlight::{is_json_document, HighlightPipeline, PipelineState};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Tab identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Icon shown next to a tab's title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TabIcon {
    /// Icon supplied by the page.
    Page(IconHandle),
    /// Fallback image for pages without an icon.
    Placeholder(PathBuf),
    /// Nothing to show (no page icon and no placeholder file).
    None,
}

/// Ask the owning host to open a new active tab for `url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingRequest {
    pub url: String,
}

/// Browser tab: one rendering surface plus the chrome state derived from it.
pub struct Tab {
    /// Tab ID.
    id: TabId,
    /// Rendering surface.
    engine: Box<dyn WebEngine>,
    /// Last committed URL.
    url: String,
    /// Page title.
    title: String,
    /// Tab icon.
    icon: TabIcon,
    /// Loading state.
    loading: bool,
    /// JSON highlighting for the current document, if running.
    highlight: Option<HighlightPipeline>,
    /// Listeners for committed URL changes.
    url_changed: Subscribers<UrlChanged>,
}

impl Tab {
    /// Create a tab around `engine` and point it at `home_url`.
    pub fn new(id: TabId, mut engine: Box<dyn WebEngine>, home_url: &str) -> Self {
        engine.load(home_url);
        Self {
            id,
            engine,
            url: home_url.to_string(),
            title: NEW_TAB_TITLE.to_string(),
            icon: TabIcon::None,
            loading: true,
            highlight: None,
            url_changed: Subscribers::new(),
        }
    }

    /// Get the tab ID.
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Get the current URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the page title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &TabIcon {
        &self.icon
    }

    /// Check if loading.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// State of the JSON highlighting pipeline, if one is attached.
    pub fn highlight_state(&self) -> Option<PipelineState> {
        self.highlight.as_ref().map(HighlightPipeline::state)
    }

    /// Register a listener for committed URL changes.
    pub fn on_url_changed(&mut self, handler: impl Fn(&UrlChanged) + Send + Sync + 'static) {
        self.url_changed.subscribe(handler);
    }

    /// Replace the URL listeners wholesale.
    pub fn set_url_subscribers(&mut self, subscribers: Subscribers<UrlChanged>) {
        self.url_changed = subscribers;
    }

    /// Navigate to a URL.
    pub fn load(&mut self, url: &str) {
        self.engine.load(url);
    }

    pub fn back(&mut self) {
        self.engine.back();
    }

    pub fn forward(&mut self) {
        self.engine.forward();
    }

    pub fn reload(&mut self) {
        self.engine.reload();
    }

    /// Apply an engine notification to this tab.
    ///
    /// Returns a [`SiblingRequest`] when a new-window request should become a
    /// new tab in the same host.
    pub fn handle_event(
        &mut self,
        event: EngineEvent,
        context: &AppContext,
    ) -> Option<SiblingRequest> {
        match event {
            EngineEvent::TitleChanged(title) => {
                self.title = if title.is_empty() {
                    NEW_TAB_TITLE.to_string()
                } else {
                    title
                };
            }
            EngineEvent::IconChanged(Some(icon)) => self.icon = TabIcon::Page(icon),
            EngineEvent::IconChanged(None) => {
                self.icon = match context.assets.locate(Asset::PlaceholderIcon) {
                    Ok(path) => TabIcon::Placeholder(path),
                    Err(error) => {
                        warn!(tab = %self.id, %error, "placeholder tab icon unavailable");
                        TabIcon::None
                    }
                };
            }
            EngineEvent::UrlChanged(url) => {
                // The document the pipeline was decorating is gone.
                self.highlight = None;
                self.url = url;
                self.url_changed.emit(&UrlChanged {
                    tab: self.id,
                    url: self.url.clone(),
                });
            }
            EngineEvent::LoadStarted => {
                self.loading = true;
                self.highlight = None;
            }
            EngineEvent::LoadFinished { ok } => {
                self.loading = false;
                if ok {
                    self.on_load_finished(context);
                }
            }
            EngineEvent::ScriptFinished { id, result } => {
                if let Some(pipeline) = self.highlight.as_mut() {
                    if pipeline.is_waiting_on(id) {
                        pipeline.on_script_finished(id, &result, self.engine.as_mut());
                    } else {
                        debug!(tab = %self.id, ?id, "ignoring stale script completion");
                    }
                }
            }
            EngineEvent::NewWindowRequested { url, modifiers } => {
                return self.on_new_window_requested(url, modifiers, context);
            }
        }
        None
    }

    fn on_load_finished(&mut self, context: &AppContext) {
        let current = self.engine.url();
        if !is_json_document(&current) {
            return;
        }

        match HighlightPipeline::prepare(&context.assets) {
            Ok(mut pipeline) => {
                debug!(tab = %self.id, url = %current, "highlighting json document");
                pipeline.start(self.engine.as_mut());
                self.highlight = Some(pipeline);
            }
            Err(error) => {
                debug!(tab = %self.id, %error, "json highlighting skipped");
            }
        }
    }

    fn on_new_window_requested(
        &mut self,
        url: String,
        modifiers: Modifiers,
        context: &AppContext,
    ) -> Option<SiblingRequest> {
        // Only the configured modifier held alone opens a tab.
        if !context.new_tab_modifier.is_empty() && modifiers == context.new_tab_modifier {
            return Some(SiblingRequest { url });
        }
        self.engine.open_in_place(&url);
        None
    }
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Assets;
    use crate::engine::ScriptId;
    use crate::highlight::HighlightStep;
    use crate::testing::{write_highlight_assets, write_placeholder_icon, RecordingEngine};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn context_with_assets(dir: &std::path::Path) -> AppContext {
        AppContext::default().with_assets(Assets::new(dir))
    }

    #[test]
    fn test_tab_creation_loads_home() {
        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let tab = Tab::new(TabId(1), Box::new(engine), "https://home.example");

        assert_eq!(tab.id(), TabId(1));
        assert_eq!(tab.url(), "https://home.example");
        assert_eq!(tab.title(), "New Tab");
        assert_eq!(log.lock().loads, vec!["https://home.example"]);
    }

    #[test]
    fn test_title_falls_back_when_empty() {
        let context = AppContext::default();
        let mut tab = Tab::new(TabId(1), Box::new(RecordingEngine::new("")), "https://a.example");

        tab.handle_event(EngineEvent::TitleChanged("Example".into()), &context);
        assert_eq!(tab.title(), "Example");

        tab.handle_event(EngineEvent::TitleChanged(String::new()), &context);
        assert_eq!(tab.title(), "New Tab");
    }

    #[test]
    fn test_icon_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut tab = Tab::new(TabId(1), Box::new(RecordingEngine::new("")), "https://a.example");

        // No placeholder file yet.
        let context = context_with_assets(dir.path());
        tab.handle_event(EngineEvent::IconChanged(None), &context);
        assert_eq!(tab.icon(), &TabIcon::None);

        let icon = IconHandle("https://a.example/favicon.ico".into());
        tab.handle_event(EngineEvent::IconChanged(Some(icon.clone())), &context);
        assert_eq!(tab.icon(), &TabIcon::Page(icon));

        write_placeholder_icon(dir.path());
        tab.handle_event(EngineEvent::IconChanged(None), &context);
        assert_eq!(
            tab.icon(),
            &TabIcon::Placeholder(dir.path().join("public/no_icon_icon.png"))
        );
    }

    #[test]
    fn test_url_change_fires_each_subscriber_once() {
        let context = AppContext::default();
        let mut tab = Tab::new(TabId(7), Box::new(RecordingEngine::new("")), "https://a.example");
        let address = Arc::new(Mutex::new(Vec::new()));
        let history = Arc::new(Mutex::new(Vec::new()));

        let seen = address.clone();
        tab.on_url_changed(move |event| seen.lock().push(event.clone()));
        let seen = history.clone();
        tab.on_url_changed(move |event| seen.lock().push(event.url.clone()));

        tab.handle_event(EngineEvent::UrlChanged("https://b.example/".into()), &context);

        assert_eq!(
            *address.lock(),
            vec![UrlChanged {
                tab: TabId(7),
                url: "https://b.example/".into()
            }]
        );
        assert_eq!(*history.lock(), vec!["https://b.example/"]);
        assert_eq!(tab.url(), "https://b.example/");
    }

    #[test]
    fn test_json_load_runs_four_injections_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_highlight_assets(dir.path());
        let context = context_with_assets(dir.path());

        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://data.example/report.json");
        tab.handle_event(
            EngineEvent::UrlChanged("https://data.example/report.json".into()),
            &context,
        );
        tab.handle_event(EngineEvent::LoadFinished { ok: true }, &context);
        assert_eq!(
            tab.highlight_state(),
            Some(PipelineState::Running(HighlightStep::Stylesheet))
        );

        for n in 1..=4 {
            assert_eq!(log.lock().scripts.len(), n);
            tab.handle_event(
                EngineEvent::ScriptFinished {
                    id: ScriptId(n as u64),
                    result: Ok(None),
                },
                &context,
            );
        }

        let scripts = log.lock().scripts.clone();
        assert_eq!(scripts.len(), 4);
        assert!(scripts[0].contains("createElement('style')"));
        assert!(scripts[1].contains("var Prism"));
        assert!(scripts[2].contains("<pre><code class=\"language-json\">"));
        assert_eq!(scripts[3], "Prism.highlightAll();");
        assert_eq!(tab.highlight_state(), Some(PipelineState::Finished));
    }

    #[test]
    fn test_non_json_load_injects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_highlight_assets(dir.path());
        let context = context_with_assets(dir.path());

        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://a.example/index.html");
        tab.handle_event(EngineEvent::LoadFinished { ok: true }, &context);

        assert!(log.lock().scripts.is_empty());
        assert_eq!(tab.highlight_state(), None);
    }

    #[test]
    fn test_navigation_drops_pending_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        write_highlight_assets(dir.path());
        let context = context_with_assets(dir.path());

        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://a.example/report.json");
        tab.handle_event(EngineEvent::LoadFinished { ok: true }, &context);
        assert_eq!(log.lock().scripts.len(), 1);

        tab.handle_event(EngineEvent::UrlChanged("https://a.example/other".into()), &context);
        tab.handle_event(
            EngineEvent::ScriptFinished {
                id: ScriptId(1),
                result: Ok(None),
            },
            &context,
        );

        assert_eq!(log.lock().scripts.len(), 1);
        assert_eq!(tab.highlight_state(), None);
    }

    #[test]
    fn test_missing_highlight_assets_leave_page_alone() {
        let dir = tempfile::tempdir().unwrap();
        let context = context_with_assets(dir.path());

        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://a.example/report.json");
        tab.handle_event(EngineEvent::LoadFinished { ok: true }, &context);

        assert!(log.lock().scripts.is_empty());
        assert_eq!(tab.highlight_state(), None);
    }

    #[test]
    fn test_new_window_request_policy() {
        let context = AppContext::default();
        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://a.example");

        let request = tab.handle_event(
            EngineEvent::NewWindowRequested {
                url: "https://b.example".into(),
                modifiers: Modifiers::SHIFT,
            },
            &context,
        );
        assert_eq!(
            request,
            Some(SiblingRequest {
                url: "https://b.example".into()
            })
        );

        let request = tab.handle_event(
            EngineEvent::NewWindowRequested {
                url: "https://c.example".into(),
                modifiers: Modifiers::CTRL,
            },
            &context,
        );
        assert_eq!(request, None);
        assert_eq!(log.lock().opened_in_place, vec!["https://c.example"]);
    }

    #[test]
    fn test_extra_modifiers_open_in_place() {
        let context = AppContext::default();
        let engine = RecordingEngine::new("about:blank");
        let log = engine.log();
        let mut tab = Tab::new(TabId(1), Box::new(engine), "https://a.example");

        let request = tab.handle_event(
            EngineEvent::NewWindowRequested {
                url: "https://d.example".into(),
                modifiers: Modifiers::SHIFT | Modifiers::CTRL,
            },
            &context,
        );
        assert_eq!(request, None);
        assert_eq!(log.lock().opened_in_place, vec!["https://d.example"]);
    }
}
