//! Command-driven shell around one window.

use crate::commands::{Command, HELP};
use common::{BrowserError, BrowserResult};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};
use ui::engine::{event_channel, EngineEvent, EngineMessage, EventReceiver};
use ui::headless::HeadlessEngineFactory;
use ui::navigation::ToolbarAction;
use ui::{AppContext, HistoryDialog, ShellWindow};

/// Whether the command loop keeps going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A window driven by text commands, with headless engines behind its tabs.
pub struct Shell {
    window: ShellWindow,
    /// Open history dialog, if any.
    dialog: Option<HistoryDialog>,
}

impl Shell {
    /// Create the shell and the receiver its engines report into.
    pub fn new(context: AppContext) -> (Self, EventReceiver) {
        let (sender, receiver) = event_channel();
        let factory = Arc::new(HeadlessEngineFactory::new(sender));
        let window = ShellWindow::new(Arc::new(context), factory);
        (
            Self {
                window,
                dialog: None,
            },
            receiver,
        )
    }

    pub fn window(&self) -> &ShellWindow {
        &self.window
    }

    pub fn dialog(&self) -> Option<&HistoryDialog> {
        self.dialog.as_ref()
    }

    /// Route one engine notification.
    pub fn handle_engine_message(&mut self, message: EngineMessage) {
        if let Some(tab) = self.window.handle_engine_event(message) {
            info!(%tab, "link opened in new tab");
        }
    }

    /// Handle every notification already queued.
    pub fn drain(&mut self, receiver: &mut EventReceiver) {
        while let Ok(message) = receiver.try_recv() {
            self.handle_engine_message(message);
        }
    }

    /// Parse and run one input line. Command failures are reported on `out`
    /// and do not stop the loop.
    pub fn run_line(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        match line.parse().and_then(|command| self.execute(command, out)) {
            Ok(flow) => Ok(flow),
            Err(BrowserError::Io(error)) => Err(error.into()),
            Err(error) => {
                writeln!(out, "error: {error}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one command.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> BrowserResult<Flow> {
        debug!(?command, "command");
        match command {
            Command::Go(text) => {
                self.window.edit_address(&text);
                if let Some(url) = self.window.submit_address()? {
                    writeln!(out, "loading {url}")?;
                }
            }
            Command::Back => {
                self.window.trigger(ToolbarAction::Back)?;
            }
            Command::Forward => {
                self.window.trigger(ToolbarAction::Forward)?;
            }
            Command::Reload => {
                self.window.trigger(ToolbarAction::Reload)?;
            }
            Command::Home => {
                self.window.trigger(ToolbarAction::Home)?;
            }
            Command::NewTab => {
                self.window.trigger(ToolbarAction::NewTab)?;
            }
            Command::Close(index) => {
                let tab = self.window.close_tab(index)?;
                writeln!(out, "closed {tab}")?;
            }
            Command::Activate(index) => self.window.activate_tab(index)?,
            Command::Tabs => self.print_tabs(out)?,
            Command::History => {
                if let Some(dialog) = self.window.trigger(ToolbarAction::History)? {
                    self.dialog = Some(dialog);
                }
                self.print_history(out)?;
            }
            Command::Select(rows) => {
                let dialog = self.dialog_mut()?;
                for row in rows {
                    dialog.toggle(row)?;
                }
                self.print_history(out)?;
            }
            Command::Unselect => {
                self.dialog_mut()?.clear_selection();
                self.print_history(out)?;
            }
            Command::Delete => {
                let removed = self.dialog_mut()?.delete_selected()?;
                writeln!(out, "deleted {removed}")?;
                self.print_history(out)?;
            }
            Command::Clear => {
                self.dialog_mut()?.delete_all()?;
                self.print_history(out)?;
            }
            Command::Open(row) => {
                let dialog = self
                    .dialog
                    .as_mut()
                    .ok_or_else(|| BrowserError::invalid("history dialog is not open"))?;
                dialog.activate_row(row, &mut self.window)?;
                self.dialog = None;
            }
            Command::Done => {
                if let Some(mut dialog) = self.dialog.take() {
                    dialog.close();
                }
            }
            Command::OpenLink { url, modifiers } => {
                let tab = self.window.tabs().active_tab()?.id();
                self.handle_engine_message(EngineMessage {
                    tab,
                    event: EngineEvent::NewWindowRequested { url, modifiers },
                });
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dialog_mut(&mut self) -> BrowserResult<&mut HistoryDialog> {
        self.dialog
            .as_mut()
            .ok_or_else(|| BrowserError::invalid("history dialog is not open"))
    }

    fn print_tabs(&self, out: &mut impl Write) -> BrowserResult<()> {
        let active = self.window.tabs().active_index();
        writeln!(out, "{} | {}", self.window.title(), self.window.address_text())?;
        for (index, tab) in self.window.tabs().tabs().iter().enumerate() {
            let marker = if active == Some(index) { '*' } else { ' ' };
            let state = if tab.is_loading() { " (loading)" } else { "" };
            writeln!(out, "{marker} {index}: {} <{}>{state}", tab.title(), tab.url())?;
        }
        Ok(())
    }

    fn print_history(&self, out: &mut impl Write) -> BrowserResult<()> {
        let Some(dialog) = &self.dialog else {
            return Ok(());
        };
        writeln!(out, "{} ({})", dialog.title(), dialog.len())?;
        for (index, row) in dialog.rows().iter().enumerate() {
            let marker = if row.selected { 'x' } else { ' ' };
            writeln!(out, "[{marker}] {index}: {}", row.url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::context::Assets;

    struct Fixture {
        _dir: tempfile::TempDir,
        shell: Shell,
        receiver: EventReceiver,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let context = AppContext::new(dir.path().join("history.txt"))
                .with_home_url("https://home.example/")
                .with_assets(Assets::new(dir.path()));
            let (mut shell, mut receiver) = Shell::new(context);
            shell.drain(&mut receiver);
            Self {
                _dir: dir,
                shell,
                receiver,
            }
        }

        fn run(&mut self, line: &str) -> (Flow, String) {
            let mut out = Vec::new();
            let flow = self.shell.run_line(line, &mut out).unwrap();
            self.shell.drain(&mut self.receiver);
            (flow, String::from_utf8(out).unwrap())
        }
    }

    #[test]
    fn test_go_resolves_and_records() {
        let mut fixture = Fixture::new();

        let (_, out) = fixture.run("go weather");
        assert_eq!(out, "loading https://duckduckgo.com/?q=weather\n");

        let (_, out) = fixture.run("tabs");
        assert!(out.contains("* 0: duckduckgo.com <https://duckduckgo.com/?q=weather>"));
    }

    #[test]
    fn test_tabs_and_close() {
        let mut fixture = Fixture::new();
        fixture.run("new");
        fixture.run("new");
        fixture.run("tab 0");
        fixture.run("close 0");

        let window = fixture.shell.window();
        assert_eq!(window.tabs().len(), 2);
        assert_eq!(window.tabs().active_index(), Some(0));
    }

    #[test]
    fn test_history_dialog_flow() {
        let mut fixture = Fixture::new();
        fixture.run("go a.example");

        let (_, out) = fixture.run("history");
        assert!(out.starts_with("Browsing History (3)\n"));
        assert!(out.contains("[ ] 0: https://home.example/"));

        let (_, out) = fixture.run("select 0");
        assert!(out.contains("[x] 0: https://home.example/"));

        let (_, out) = fixture.run("delete");
        assert!(out.starts_with("deleted 1\n"));
        assert_eq!(
            fixture.shell.window().history().load_all().unwrap(),
            vec!["https://a.example", "https://a.example"]
        );

        fixture.run("open 0");
        assert!(fixture.shell.dialog().is_none());
    }

    #[test]
    fn test_unselect_keeps_entries() {
        let mut fixture = Fixture::new();
        fixture.run("history");
        fixture.run("select 0");

        let (_, out) = fixture.run("unselect");
        assert!(out.contains("[ ] 0: https://home.example/"));

        let (_, out) = fixture.run("delete");
        assert!(out.starts_with("deleted 0\n"));
        assert_eq!(
            fixture.shell.window().history().load_all().unwrap(),
            vec!["https://home.example/"]
        );
    }

    #[test]
    fn test_dialog_commands_need_open_dialog() {
        let mut fixture = Fixture::new();
        let (flow, out) = fixture.run("delete");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "error: Invalid operation: history dialog is not open\n");
    }

    #[test]
    fn test_shift_open_creates_tab() {
        let mut fixture = Fixture::new();
        fixture.run("shift-open https://b.example/");

        let tabs = fixture.shell.window().tabs();
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_tab().unwrap().url(), "https://b.example/");
    }

    #[test]
    fn test_open_link_stays_in_tab() {
        let mut fixture = Fixture::new();
        fixture.run("open-link https://b.example/");

        let tabs = fixture.shell.window().tabs();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.active_tab().unwrap().url(), "https://b.example/");
    }

    #[test]
    fn test_no_tabs_reports_error() {
        let mut fixture = Fixture::new();
        fixture.run("close 0");
        let (_, out) = fixture.run("back");
        assert_eq!(out, "error: No active tab\n");
    }

    #[test]
    fn test_quit_and_blank_lines() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.run("   ").0, Flow::Continue);
        assert_eq!(fixture.run("quit").0, Flow::Quit);
    }
}
