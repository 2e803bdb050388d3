//! Flat-file browsing history.
//!
//! One URL per line, newline-terminated, oldest first. Entries have no
//! identity beyond their line number and duplicates are kept.

use common::{BrowserError, BrowserResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only log of visited URLs.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add one URL to the end of the log.
    pub fn append(&self, url: &str) -> BrowserResult<()> {
        check_line(url)?;
        self.ensure_parent()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|error| BrowserError::file(&self.path, error))?;
        writeln!(file, "{url}").map_err(|error| BrowserError::file(&self.path, error))
    }

    /// Every recorded URL, oldest first. A history file that does not exist yet
    /// is an empty history. Lines come back as written, empty ones included;
    /// only a trailing `\r` is dropped.
    pub fn load_all(&self) -> BrowserResult<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(BrowserError::file(&self.path, error)),
        };

        Ok(content
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect())
    }

    /// Rewrite the whole log with exactly `urls`.
    ///
    /// The new content goes to a sibling file that is renamed over the log, so
    /// readers see either the old or the new history.
    pub fn replace_all<S: AsRef<str>>(&self, urls: &[S]) -> BrowserResult<()> {
        let mut content = String::new();
        for url in urls {
            let url = url.as_ref();
            check_line(url)?;
            content.push_str(url);
            content.push('\n');
        }

        self.ensure_parent()?;
        let staging = self.staging_path();
        fs::write(&staging, content).map_err(|error| BrowserError::file(&staging, error))?;
        fs::rename(&staging, &self.path).map_err(|error| {
            let _ = fs::remove_file(&staging);
            BrowserError::file(&self.path, error)
        })
    }

    /// Remove every entry.
    pub fn clear(&self) -> BrowserResult<()> {
        self.replace_all::<&str>(&[])
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "history".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> BrowserResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|error| BrowserError::file(parent, error))
            }
            _ => Ok(()),
        }
    }
}

fn check_line(url: &str) -> BrowserResult<()> {
    if url.contains(['\n', '\r']) {
        return Err(BrowserError::invalid(format!(
            "history entry contains a line break: {url:?}"
        )));
    }
    Ok(())
}
