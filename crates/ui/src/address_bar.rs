//! Address bar component.

use crate::events::UrlChanged;
use crate::tab::TabId;

/// Address bar.
///
/// Mirrors the URL of the tab it tracks, except while the user is editing:
/// URL changes that arrive mid-edit update the stored URL but leave the typed
/// text alone.
#[derive(Debug, Default)]
pub struct AddressBar {
    /// Tab whose URL is mirrored.
    tracking: Option<TabId>,
    /// Current URL.
    url: String,
    /// Input text.
    input: String,
    /// Is focused.
    focused: bool,
    /// Cursor position, in characters.
    cursor: usize,
}

impl AddressBar {
    /// Create a new address bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the displayed text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Tab currently mirrored.
    pub fn tracking(&self) -> Option<TabId> {
        self.tracking
    }

    /// Set the URL.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        if !self.focused {
            self.input = url.to_string();
            self.cursor = self.input.chars().count();
        }
    }

    /// Start mirroring `tab`, replacing whatever is shown (an in-progress edit
    /// included).
    pub fn track(&mut self, tab: TabId, url: &str) {
        self.tracking = Some(tab);
        self.focused = false;
        self.set_url(url);
    }

    /// Stop mirroring anything; used when the last tab closes.
    pub fn detach(&mut self) {
        self.tracking = None;
        self.focused = false;
        self.set_url("");
    }

    /// URL listener: follow changes of the tracked tab only.
    pub fn on_url_changed(&mut self, event: &UrlChanged) {
        if self.tracking == Some(event.tab) {
            self.set_url(&event.url);
        }
    }

    /// Set the input text.
    pub fn set_input(&mut self, input: &str) {
        self.focused = true;
        self.input = input.to_string();
        self.cursor = self.input.chars().count();
    }

    /// Focus the address bar.
    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor = self.input.chars().count();
    }

    /// Blur the address bar.
    pub fn blur(&mut self) {
        self.focused = false;
        self.input = self.url.clone();
        self.cursor = self.input.chars().count();
    }

    /// Check if focused (an edit is in progress).
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Get cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle key input.
    pub fn on_key(&mut self, key: Key) -> Option<AddressBarAction> {
        match key {
            Key::Char(c) => {
                self.focused = true;
                let at = self.byte_offset(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
                None
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.focused = true;
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.input.remove(at);
                }
                None
            }
            Key::Delete => {
                if self.cursor < self.input.chars().count() {
                    self.focused = true;
                    let at = self.byte_offset(self.cursor);
                    self.input.remove(at);
                }
                None
            }
            Key::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            Key::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
                None
            }
            Key::Home => {
                self.cursor = 0;
                None
            }
            Key::End => {
                self.cursor = self.input.chars().count();
                None
            }
            Key::Enter => {
                self.focused = false;
                Some(AddressBarAction::Navigate(self.input.clone()))
            }
            Key::Escape => {
                self.blur();
                Some(AddressBarAction::Cancel)
            }
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(offset, _)| offset)
    }
}

/// Key input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
}

/// Address bar action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressBarAction {
    /// Submit the typed text for resolution.
    Navigate(String),
    Cancel,
}
