//! Browser history UI.

use crate::history::HistoryStore;
use crate::window::ShellWindow;
use common::{BrowserError, BrowserResult};
use std::sync::Arc;
use tracing::{info, warn};

pub const HISTORY_DIALOG_TITLE: &str = "Browsing History";

/// History row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    pub url: String,
    pub selected: bool,
}

/// Modal list of recorded URLs with delete and navigate actions.
#[derive(Debug)]
pub struct HistoryDialog {
    store: Arc<HistoryStore>,
    rows: Vec<HistoryRow>,
    open: bool,
}

impl HistoryDialog {
    /// Open the dialog on the current contents of `store`. An unreadable log
    /// shows as an empty list.
    pub fn open(store: Arc<HistoryStore>) -> Self {
        let urls = store.load_all().unwrap_or_else(|error| {
            warn!(%error, "history unavailable");
            Vec::new()
        });
        let rows = urls
            .into_iter()
            .map(|url| HistoryRow {
                url,
                selected: false,
            })
            .collect();

        Self {
            store,
            rows,
            open: true,
        }
    }

    pub fn title(&self) -> &'static str {
        HISTORY_DIALOG_TITLE
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn urls(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.url.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Add `row` to the selection.
    pub fn select(&mut self, row: usize) -> BrowserResult<()> {
        self.row_mut(row)?.selected = true;
        Ok(())
    }

    /// Flip the selection state of `row`.
    pub fn toggle(&mut self, row: usize) -> BrowserResult<()> {
        let row = self.row_mut(row)?;
        row.selected = !row.selected;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
    }

    /// Indices of the selected rows.
    pub fn selected(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.selected)
            .map(|(index, _)| index)
            .collect()
    }

    /// Remove the selected rows and rewrite the log with what remains, in
    /// display order. Returns how many rows were removed.
    pub fn delete_selected(&mut self) -> BrowserResult<usize> {
        let before = self.rows.len();
        self.rows.retain(|row| !row.selected);
        let removed = before - self.rows.len();

        let remaining = self.urls();
        self.store.replace_all(&remaining)?;
        info!(removed, remaining = remaining.len(), "deleted history entries");
        Ok(removed)
    }

    /// Remove every row and empty the log.
    pub fn delete_all(&mut self) -> BrowserResult<()> {
        self.rows.clear();
        self.store.clear()?;
        info!("cleared history");
        Ok(())
    }

    /// Navigate `window` to the URL in `row` and close the dialog. The stored
    /// URL is already resolved, so it is loaded as is.
    pub fn activate_row(&mut self, row: usize, window: &mut ShellWindow) -> BrowserResult<()> {
        let url = self
            .rows
            .get(row)
            .map(|row| row.url.clone())
            .ok_or_else(|| self.out_of_range(row))?;
        window.navigate_to_resolved(&url)?;
        self.close();
        Ok(())
    }

    fn row_mut(&mut self, row: usize) -> BrowserResult<&mut HistoryRow> {
        let error = self.out_of_range(row);
        self.rows.get_mut(row).ok_or(error)
    }

    fn out_of_range(&self, row: usize) -> BrowserError {
        BrowserError::invalid(format!(
            "no history row {row} ({} rows)",
            self.rows.len()
        ))
    }
}
