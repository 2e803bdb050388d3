//! Browser UI shell.
//!
//! This crate provides the coordinator between the browser chrome and an
//! embedded web engine:
//! - Tabs and the tab host
//! - Address bar and its URL-or-search resolution
//! - Navigation toolbar
//! - Flat-file browsing history and its dialog
//! - JSON document highlighting
//! - A headless engine for driving the shell without a renderer

pub mod address_bar;
pub mod context;
pub mod engine;
pub mod events;
pub mod headless;
pub mod highlight;
pub mod history;
pub mod history_ui;
pub mod navigation;
pub mod tab;
pub mod tab_host;
pub mod window;

#[cfg(test)]
mod testing;

pub use context::AppContext;
pub use engine::{EngineEvent, EngineFactory, EngineMessage, WebEngine};
pub use history::HistoryStore;
pub use history_ui::HistoryDialog;
pub use tab::{Tab, TabId};
pub use tab_host::TabHost;
pub use window::ShellWindow;
