//! Web engine boundary.
//!
//! The embedded rendering engine is a black box. The shell drives it through
//! [`WebEngine`] and learns about what happened through [`EngineEvent`]s that
//! the host loop routes back to the owning tab. Every event is delivered on the
//! shell's own task, so nothing behind this trait needs to be thread-aware
//! beyond being `Send`.

use crate::tab::TabId;
use bitflags::bitflags;
use tokio::sync::mpsc;

/// Handle returned by [`WebEngine::run_script`], echoed in the completion event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptId(pub u64);

/// Outcome of an injected script. `Ok` carries the script's value rendered as
/// text, if it produced one.
pub type ScriptResult = Result<Option<String>, String>;

/// Opaque page icon handed over by the engine (typically a favicon URL).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconHandle(pub String);

bitflags! {
    /// Keyboard modifiers held while the engine asked for a new surface.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Parse a modifier name as used in config files and commands.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "option" => Some(Self::ALT),
            "meta" | "cmd" | "super" => Some(Self::META),
            _ => None,
        }
    }
}

/// Notification emitted by a web engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The committed URL changed.
    UrlChanged(String),
    /// The document title changed.
    TitleChanged(String),
    /// The page icon changed; `None` means the page has no icon.
    IconChanged(Option<IconHandle>),
    /// A load began.
    LoadStarted,
    /// A load completed, successfully or not.
    LoadFinished { ok: bool },
    /// An injected script finished executing.
    ScriptFinished { id: ScriptId, result: ScriptResult },
    /// The page asked for a new window (link with a target, `window.open`).
    NewWindowRequested { url: String, modifiers: Modifiers },
}

/// Engine event tagged with the tab whose engine produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineMessage {
    pub tab: TabId,
    pub event: EngineEvent,
}

pub type EventSender = mpsc::UnboundedSender<EngineMessage>;
pub type EventReceiver = mpsc::UnboundedReceiver<EngineMessage>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Narrow capability set a tab needs from its rendering surface.
pub trait WebEngine: Send {
    /// Start loading `url`.
    fn load(&mut self, url: &str);

    fn back(&mut self);

    fn forward(&mut self);

    fn reload(&mut self);

    /// The URL currently committed in this surface.
    fn url(&self) -> String;

    /// Inject `code` into the current document. Completion arrives later as
    /// [`EngineEvent::ScriptFinished`] carrying the returned id.
    fn run_script(&mut self, code: &str) -> ScriptId;

    /// Satisfy a new-window request without creating a new tab.
    fn open_in_place(&mut self, url: &str) {
        self.load(url);
    }
}

/// Creates one rendering surface per tab.
pub trait EngineFactory: Send + Sync {
    fn create(&self, tab: TabId) -> Box<dyn WebEngine>;
}
