//! Navigation toolbar.

use crate::context::{Asset, Assets};
use std::path::PathBuf;
use tracing::debug;

/// Toolbar action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    History,
}

impl ToolbarAction {
    /// Actions in toolbar order. The address field sits between New Tab and
    /// History.
    pub const ALL: [ToolbarAction; 6] = [
        ToolbarAction::Back,
        ToolbarAction::Forward,
        ToolbarAction::Reload,
        ToolbarAction::Home,
        ToolbarAction::NewTab,
        ToolbarAction::History,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolbarAction::Back => "Back",
            ToolbarAction::Forward => "Forward",
            ToolbarAction::Reload => "Reload",
            ToolbarAction::Home => "Home",
            ToolbarAction::NewTab => "New Tab",
            ToolbarAction::History => "History",
        }
    }

    pub fn icon(self) -> Asset {
        match self {
            ToolbarAction::Back => Asset::BackIcon,
            ToolbarAction::Forward => Asset::ForwardIcon,
            ToolbarAction::Reload => Asset::ReloadIcon,
            ToolbarAction::Home => Asset::HomeIcon,
            ToolbarAction::NewTab => Asset::NewTabIcon,
            ToolbarAction::History => Asset::HistoryIcon,
        }
    }
}

/// One toolbar button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarItem {
    pub action: ToolbarAction,
    pub label: &'static str,
    /// Icon file; `None` renders the label only.
    pub icon: Option<PathBuf>,
}

/// Toolbar buttons with their icons resolved against `assets`.
pub fn toolbar(assets: &Assets) -> Vec<ToolbarItem> {
    ToolbarAction::ALL
        .iter()
        .map(|&action| {
            let icon = match assets.locate(action.icon()) {
                Ok(path) => Some(path),
                Err(error) => {
                    debug!(?action, %error, "toolbar icon unavailable");
                    None
                }
            };
            ToolbarItem {
                action,
                label: action.label(),
                icon,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_order_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let items = toolbar(&Assets::new(dir.path()));

        let labels: Vec<_> = items.iter().map(|item| item.label).collect();
        assert_eq!(
            labels,
            vec!["Back", "Forward", "Reload", "Home", "New Tab", "History"]
        );
        assert!(items.iter().all(|item| item.icon.is_none()));
    }

    #[test]
    fn test_toolbar_icons_resolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public/home_icon.png"), b"png").unwrap();

        let items = toolbar(&Assets::new(dir.path()));
        let home = items
            .iter()
            .find(|item| item.action == ToolbarAction::Home)
            .unwrap();
        assert_eq!(home.icon, Some(dir.path().join("public/home_icon.png")));
        assert!(items[0].icon.is_none());
    }
}
